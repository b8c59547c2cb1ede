//! `javascript(..)` through a script host.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use autotag_tests::prelude::*;

/// Answers a handful of fixed scripts.
struct FixedScripts;

impl ScriptHost for FixedScripts {
    fn evaluate(&self, script: &str, download: &dyn Download, tag: &TagRef) -> ScriptResult<Value> {
        match script {
            "big" => Ok(Value::Bool(download.merged_data_bytes() > 1_000)),
            "own-tag" => Ok(Value::Bool(tag.name == "Scripted")),
            "number" => Ok(Value::Number(1.0)),
            "panic" => panic!("script host bug"),
            "slow" => {
                thread::sleep(Duration::from_millis(20));
                Ok(Value::Bool(false))
            }
            _ => Err(ScriptError::failed(format!("unknown script {}", script))),
        }
    }
}

fn fixture() -> Fixture {
    let fx = Fixture::builder().scripts(Arc::new(FixedScripts)).build().unwrap();
    fx.add_download(DownloadAttrs {
        merged_data_bytes: 5_000,
        ..DownloadAttrs::named("merged")
    })
    .unwrap();
    fx.add_download(DownloadAttrs::named("plain")).unwrap();
    fx
}

#[test]
fn test_boolean_script_result_drives_membership() {
    // GIVEN
    let fx = fixture();
    fx.constrained_tag("Big", "javascript(\"big\")").unwrap();
    fx.constrained_tag("Scripted", "javascript(\"own-tag\")").unwrap();

    // WHEN
    fx.initialise().unwrap();

    // THEN
    fx.verify(Expect::tag("Big").members(["merged"])).unwrap();
    fx.verify(Expect::tag("Scripted").members(["merged", "plain"]))
        .unwrap();
}

#[test]
fn test_script_failures_are_false() {
    // GIVEN
    let fx = fixture();
    fx.constrained_tag("Number", "javascript(\"number\")").unwrap();
    fx.constrained_tag("Failing", "javascript(\"missing\")").unwrap();
    fx.constrained_tag("Panicking", "javascript(\"panic\")").unwrap();
    fx.constrained_tag("After", "!javascript(\"panic\")").unwrap();

    // WHEN
    fx.initialise().unwrap();

    // THEN: the worker survives and keeps reconciling
    fx.verify(Expect::tag("Number").empty()).unwrap();
    fx.verify(Expect::tag("Failing").empty()).unwrap();
    fx.verify(Expect::tag("Panicking").empty()).unwrap();
    fx.verify(Expect::tag("After").members(["merged", "plain"]))
        .unwrap();
}

#[test]
fn test_without_host_scripts_are_false() {
    let fx = Fixture::new().unwrap();
    fx.add_download(DownloadAttrs::named("a")).unwrap();
    fx.constrained_tag("Any", "javascript(\"big\")").unwrap();

    fx.initialise().unwrap();

    fx.verify(Expect::tag("Any").empty().state(TagState::Active))
        .unwrap();
}

#[test]
fn test_settle_waits_for_follow_up_work() {
    // GIVEN a slow constraint ahead of a tag chained on a later one
    let fx = fixture();
    fx.constrained_tag("Slow", "javascript(\"slow\")").unwrap();
    fx.constrained_tag("Chained", "hasTag(\"Done\")").unwrap();
    fx.constrained_tag("Done", "isComplete()").unwrap();
    fx.initialise().unwrap();

    // WHEN
    fx.add_download(DownloadAttrs {
        complete: true,
        ..DownloadAttrs::named("finished")
    })
    .unwrap();
    fx.settle().unwrap();

    // THEN the re-apply queued by the Done membership has already run
    assert!(fx.is_member("Done", "finished").unwrap());
    assert!(fx.is_member("Chained", "finished").unwrap());
}
