//! Function binding: name lookup and parameter validation.

use autotag_core::Network;

use crate::scanner::split_params;
use crate::{CompileError, CompileResult, FnCall, Function, Operand, Param};

/// Bind `name(args)` to a registered function.
pub(crate) fn bind_call(name: &str, args: &str) -> CompileResult<FnCall> {
    let function = Function::lookup(name).ok_or_else(|| CompileError::unknown_function(name))?;
    let texts = split_params(args);
    let bad = |reason: &str| CompileError::bad_function(name, args, reason);

    let params = match function {
        Function::HasTag | Function::Javascript => {
            expect_count(&texts, 1).map_err(|r| bad(&r))?;
            let literal = string_literal(&texts[0]).ok_or_else(|| bad("expected a quoted string"))?;
            vec![Param::resolved(
                texts[0].clone(),
                Operand::Text(literal.to_string()),
            )]
        }

        Function::HasNet => {
            expect_count(&texts, 1).map_err(|r| bad(&r))?;
            let literal = string_literal(&texts[0]).ok_or_else(|| bad("expected a quoted string"))?;
            let net = Network::internalise(literal)
                .ok_or_else(|| bad(&format!("unknown network '{}'", literal)))?;
            vec![Param::resolved(texts[0].clone(), Operand::Network(net))]
        }

        Function::IsPrivate
        | Function::IsForceStart
        | Function::IsComplete
        | Function::CanArchive => {
            expect_count(&texts, 0).map_err(|r| bad(&r))?;
            Vec::new()
        }

        Function::Compare(_) | Function::Contains => {
            expect_count(&texts, 2).map_err(|r| bad(&r))?;
            texts.into_iter().map(Param::raw).collect()
        }

        Function::Matches => {
            expect_count(&texts, 2).map_err(|r| bad(&r))?;
            let pattern = string_literal(&texts[1])
                .ok_or_else(|| bad("pattern must be a quoted string"))?
                .to_string();
            vec![Param::raw(texts[0].clone()), Param::raw(pattern)]
        }
    };

    Ok(FnCall {
        function,
        params,
        args: args.to_string(),
    })
}

fn expect_count(texts: &[String], expected: usize) -> Result<(), String> {
    if texts.len() == expected {
        Ok(())
    } else {
        Err(format!("expected {} parameter(s), found {}", expected, texts.len()))
    }
}

/// The inner text of a `"..."` literal.
pub(crate) fn string_literal(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}
