//! Start-up batch: constraints reported before the population is loaded.

use autotag_tests::prelude::*;

fn complete(name: &str) -> DownloadAttrs {
    DownloadAttrs {
        complete: true,
        ..DownloadAttrs::named(name)
    }
}

mod batch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_startup_batch_assigns_every_constrained_tag() {
        // GIVEN
        let fx = Fixture::new().unwrap();
        fx.add_download(complete("alpha")).unwrap();
        fx.add_download(DownloadAttrs {
            share_ratio: ShareRatio::PerMille(2_000),
            ..DownloadAttrs::named("beta")
        })
        .unwrap();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.constrained_tag("Good Ratio", "isGE(shareratio, 1.5)").unwrap();

        // WHEN
        fx.initialise().unwrap();

        // THEN
        fx.verify(Expect::tag("Done").members(["alpha"]).state(TagState::Active))
            .unwrap();
        fx.verify(Expect::tag("Good Ratio").members(["beta"])).unwrap();
    }

    #[test]
    fn test_nothing_is_tagged_before_initialisation() {
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.add_download(complete("early")).unwrap();
        fx.settle().unwrap();

        assert_eq!(fx.members("Done").unwrap(), Vec::<String>::new());

        fx.initialise().unwrap();

        fx.verify(Expect::tag("Done").members(["early"])).unwrap();
    }

    #[test]
    fn test_transient_downloads_are_never_tagged() {
        let fx = Fixture::new().unwrap();
        fx.add_download(complete("kept")).unwrap();
        fx.add_download(DownloadAttrs {
            persistent: false,
            ..complete("transient")
        })
        .unwrap();
        fx.constrained_tag("Done", "isComplete()").unwrap();

        fx.initialise().unwrap();

        fx.verify(Expect::tag("Done").members(["kept"]).excludes("transient"))
            .unwrap();
    }

    #[test]
    fn test_initialising_twice_keeps_first_population() {
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.initialise().unwrap();

        // Created after start-up, so it is reported on its own.
        fx.add_download(complete("later")).unwrap();
        fx.initialise().unwrap();

        fx.verify(Expect::tag("Done").members(["later"])).unwrap();
    }
}

mod chains {
    use super::*;

    #[test]
    fn test_has_tag_on_a_later_tag_settles_in_second_pass() {
        // GIVEN: "Keep" is registered first, so the first pass evaluates it
        // before "Seeding" has any members.
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Keep", "hasTag(\"Seeding\") && !isPrivate()")
            .unwrap();
        fx.constrained_tag("Seeding", "isComplete()").unwrap();
        fx.add_download(complete("public")).unwrap();
        fx.add_download(DownloadAttrs {
            private: true,
            ..complete("private")
        })
        .unwrap();
        fx.add_download(DownloadAttrs::named("partial")).unwrap();

        // WHEN
        fx.initialise().unwrap();

        // THEN
        fx.verify(Expect::tag("Seeding").members(["private", "public"]))
            .unwrap();
        fx.verify(Expect::tag("Keep").members(["public"])).unwrap();
    }

    #[test]
    fn test_seeding_and_not_archived() {
        let fx = Fixture::new().unwrap();
        fx.plain_tag("Seeding").unwrap();
        fx.plain_tag("Archived").unwrap();
        fx.constrained_tag("Active Seed", "hasTag(\"Seeding\") && !hasTag(\"Archived\")")
            .unwrap();
        fx.add_download(DownloadAttrs::named("only-seeding")).unwrap();
        fx.add_download(DownloadAttrs::named("both")).unwrap();
        fx.tag("Seeding", "only-seeding").unwrap();
        fx.tag("Seeding", "both").unwrap();
        fx.tag("Archived", "both").unwrap();

        fx.initialise().unwrap();

        fx.verify(Expect::tag("Active Seed").members(["only-seeding"]))
            .unwrap();
    }
}
