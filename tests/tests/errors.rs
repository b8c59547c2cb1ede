//! Bad sources and bad arguments never stop reconciliation.

use autotag_tests::prelude::*;

fn error_message(state: TagState) -> String {
    match state {
        TagState::Error(message) => message,
        other => panic!("expected an error state, got {}", other),
    }
}

mod compile {
    use super::*;

    #[test]
    fn test_unmatched_paren_does_not_stop_worker() {
        // GIVEN
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Broken", "(hasTag(\"x\")").unwrap();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.add_download(DownloadAttrs {
            complete: true,
            ..DownloadAttrs::named("a")
        })
        .unwrap();

        // WHEN
        fx.initialise().unwrap();

        // THEN
        assert!(matches!(fx.state("Broken").unwrap(), TagState::Error(_)));
        fx.verify(Expect::tag("Done").members(["a"]).state(TagState::Active))
            .unwrap();
    }

    #[test]
    fn test_errored_tag_membership_is_left_alone() {
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Broken", "isComplete() ^").unwrap();
        fx.add_download(DownloadAttrs::named("a")).unwrap();
        fx.initialise().unwrap();

        fx.tag("Broken", "a").unwrap();
        fx.sweep().unwrap();

        fx.verify(Expect::tag("Broken").members(["a"])).unwrap();
    }

    #[test]
    fn test_fixing_source_recovers() {
        // GIVEN
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Auto", "isGreat(shareratio, 1)").unwrap();
        fx.add_download(DownloadAttrs {
            share_ratio: ShareRatio::PerMille(3_000),
            ..DownloadAttrs::named("a")
        })
        .unwrap();
        fx.initialise().unwrap();
        assert!(error_message(fx.state("Auto").unwrap()).contains("isGreat"));

        // WHEN
        let state = fx.set_constraint("Auto", Some("isGT(shareratio, 1)")).unwrap();

        // THEN
        assert_eq!(state, TagState::Active);
        fx.verify(Expect::tag("Auto").members(["a"])).unwrap();
    }

    #[test]
    fn test_xor_needs_two_operands() {
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Single", "^isComplete()").unwrap();
        fx.constrained_tag("Triple", "isComplete() ^ isPrivate() ^ canArchive()")
            .unwrap();

        assert!(matches!(fx.state("Single").unwrap(), TagState::Error(_)));
        assert_eq!(fx.state("Triple").unwrap(), TagState::Active);
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Net", "hasNet(\"Carrier Pigeon\")").unwrap();

        assert!(matches!(fx.state("Net").unwrap(), TagState::Error(_)));
    }
}

mod runtime {
    use super::*;

    #[test]
    fn test_bad_arguments_evaluate_false() {
        // GIVEN
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Keyword", "isGE(bogus, 0) && isLT(bogus, 1)")
            .unwrap();
        fx.constrained_tag("Identifier", "contains(title, \"a\")").unwrap();
        fx.constrained_tag("Pattern", "matches(name, \"[\")").unwrap();
        fx.constrained_tag("Fine", "matches(name, \"^A\")").unwrap();
        fx.add_download(DownloadAttrs::named("alpha")).unwrap();

        // WHEN
        fx.initialise().unwrap();
        fx.sweep().unwrap();

        // THEN: unknown keywords read as 0, so only the keyword tag matches
        fx.verify(Expect::tag("Keyword").members(["alpha"])).unwrap();
        fx.verify(Expect::tag("Identifier").empty()).unwrap();
        fx.verify(Expect::tag("Pattern").empty()).unwrap();
        fx.verify(Expect::tag("Fine").members(["alpha"])).unwrap();
    }
}
