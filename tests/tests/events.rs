//! Notifications after start-up: new downloads, membership edits, source edits.

use autotag_tests::prelude::*;

fn started(tags: &[(&str, &str)], downloads: Vec<DownloadAttrs>) -> Fixture {
    let fx = Fixture::new().unwrap();
    for (name, source) in tags {
        fx.constrained_tag(name, source).unwrap();
    }
    for attrs in downloads {
        fx.add_download(attrs).unwrap();
    }
    fx.initialise().unwrap();
    fx
}

fn attrs(name: &str, f: impl FnOnce(&mut DownloadAttrs)) -> DownloadAttrs {
    let mut attrs = DownloadAttrs::named(name);
    f(&mut attrs);
    attrs
}

mod downloads {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_created_download_is_tagged() {
        // GIVEN
        let fx = started(&[("Ubuntu", "contains(name, \"ubuntu\")")], vec![]);

        // WHEN
        fx.add_download(DownloadAttrs::named("ubuntu-22.04.iso")).unwrap();
        fx.add_download(DownloadAttrs::named("debian-12.iso")).unwrap();

        // THEN
        fx.verify(Expect::tag("Ubuntu").members(["ubuntu-22.04.iso"]))
            .unwrap();
    }

    #[test]
    fn test_attribute_change_waits_for_sweep() {
        let fx = started(&[("Done", "isComplete()")], vec![DownloadAttrs::named("a")]);

        fx.update("a", |a| a.complete = true).unwrap();
        fx.settle().unwrap();
        assert!(!fx.is_member("Done", "a").unwrap());

        fx.sweep().unwrap();
        assert!(fx.is_member("Done", "a").unwrap());
    }

    #[test]
    fn test_destroyed_download_leaves_tags() {
        let fx = started(
            &[("Done", "isComplete()")],
            vec![attrs("a", |a| a.complete = true), attrs("b", |a| a.complete = true)],
        );

        fx.destroy("a").unwrap();
        fx.sweep().unwrap();

        fx.verify(Expect::tag("Done").members(["b"])).unwrap();
    }

    #[test]
    fn test_sweep_converges_on_every_download() {
        // GIVEN
        let ratios = [0, 500, 999, 1_000, 1_001, 4_000];
        let fx = Fixture::new().unwrap();
        fx.constrained_tag("Ratio", "isGE(shareratio, 1) && !isPrivate()")
            .unwrap();
        for (i, pm) in ratios.iter().enumerate() {
            fx.add_download(attrs(&format!("d{}", i), |a| {
                a.share_ratio = ShareRatio::PerMille(*pm);
                a.private = i % 2 == 1;
            }))
            .unwrap();
        }
        fx.add_download(attrs("unbounded", |a| a.share_ratio = ShareRatio::Infinite))
            .unwrap();

        // WHEN
        fx.initialise().unwrap();
        fx.sweep().unwrap();

        // THEN: membership equals the predicate for every download
        let mut expected: Vec<String> = ratios
            .iter()
            .enumerate()
            .filter(|(i, pm)| **pm >= 1_000 && i % 2 == 0)
            .map(|(i, _)| format!("d{}", i))
            .collect();
        expected.push("unbounded".to_string());
        expected.sort();
        assert_eq!(fx.members("Ratio").unwrap(), expected);
    }
}

mod membership {
    use super::*;

    #[test]
    fn test_manual_tag_drives_dependent_constraint() {
        // GIVEN
        let fx = started(&[("Archive", "hasTag(\"Watched\")")], vec![DownloadAttrs::named("film")]);
        fx.plain_tag("Watched").unwrap();

        // WHEN
        fx.tag("Watched", "film").unwrap();

        // THEN
        fx.verify(Expect::tag("Archive").members(["film"])).unwrap();

        // WHEN
        fx.untag("Watched", "film").unwrap();

        // THEN: removal is applied straight away
        fx.verify(Expect::tag("Archive").empty()).unwrap();
    }

    #[test]
    fn test_constraint_removes_manual_member() {
        let fx = started(&[("Done", "isComplete()")], vec![DownloadAttrs::named("a")]);

        fx.tag("Done", "a").unwrap();

        fx.verify(Expect::tag("Done").empty()).unwrap();
    }
}

mod sources {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_change_clears_then_resweeps() {
        // GIVEN
        let fx = started(
            &[("Auto", "isComplete()")],
            vec![attrs("a", |a| a.complete = true), attrs("b", |a| a.private = true)],
        );
        fx.verify(Expect::tag("Auto").members(["a"])).unwrap();

        // WHEN
        let state = fx.set_constraint("Auto", Some("isPrivate()")).unwrap();

        // THEN
        assert_eq!(state, TagState::Active);
        fx.verify(Expect::tag("Auto").members(["b"])).unwrap();
    }

    #[test]
    fn test_clearing_source_leaves_members() {
        let fx = started(&[("Auto", "isComplete()")], vec![attrs("a", |a| a.complete = true)]);

        let state = fx.set_constraint("Auto", None).unwrap();

        assert_eq!(state, TagState::Unconstrained);
        fx.verify(Expect::tag("Auto").members(["a"])).unwrap();
        fx.verify_timer(false).unwrap();
    }

    #[test]
    fn test_removed_tag_stops_being_reconciled() {
        let fx = started(
            &[("Done", "isComplete()"), ("Private", "isPrivate()")],
            vec![attrs("a", |a| a.complete = true)],
        );

        fx.remove_tag("Done").unwrap();
        fx.update("a", |a| a.private = true).unwrap();
        fx.sweep().unwrap();

        fx.verify(Expect::tag("Private").members(["a"])).unwrap();
        assert_eq!(fx.handler().constrained_count(), 1);
    }
}
