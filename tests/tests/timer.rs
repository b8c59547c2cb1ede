//! The sweep timer runs exactly while some tag is constrained.

use autotag_tests::prelude::*;

mod lifecycle {
    use super::*;

    #[test]
    fn test_idle_without_constrained_tags() {
        let fx = Fixture::new().unwrap();
        fx.plain_tag("Manual").unwrap();
        fx.initialise().unwrap();

        fx.verify_timer(false).unwrap();
    }

    #[test]
    fn test_timer_follows_constrained_tags() {
        // GIVEN
        let fx = Fixture::new().unwrap();

        // WHEN
        fx.constrained_tag("A", "isComplete()").unwrap();
        fx.constrained_tag("B", "isPrivate()").unwrap();

        // THEN
        fx.verify_timer(true).unwrap();

        // WHEN
        fx.remove_tag("A").unwrap();

        // THEN
        fx.verify_timer(true).unwrap();

        // WHEN
        fx.remove_tag("B").unwrap();

        // THEN
        fx.verify_timer(false).unwrap();
    }

    #[test]
    fn test_tag_with_compile_error_keeps_timer() {
        let fx = Fixture::new().unwrap();

        fx.constrained_tag("Broken", "isComplete(").unwrap();

        fx.verify_timer(true).unwrap();
        assert_eq!(fx.handler().constrained_count(), 1);

        fx.set_constraint("Broken", Some("")).unwrap();

        fx.verify_timer(false).unwrap();
    }
}

mod periodic {
    use super::*;

    fn fast() -> Fixture {
        Fixture::builder()
            .system_clock()
            .config(
                HandlerConfig::default()
                    .with_sweep_interval(Duration::from_millis(20))
                    .with_worker_name("autotag-timer-test"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_timer_sweep_picks_up_attribute_changes() {
        // GIVEN
        let fx = fast();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.add_download(DownloadAttrs::named("a")).unwrap();
        fx.initialise().unwrap();

        // WHEN: nothing is reported
        fx.update("a", |a| a.complete = true).unwrap();

        // THEN
        fx.wait_until("timer sweep", Duration::from_secs(5), |fx| {
            fx.is_member("Done", "a").unwrap_or(false)
        })
        .unwrap();
    }

    #[test]
    fn test_no_sweeps_after_last_tag_removed() {
        // GIVEN
        let fx = fast();
        fx.constrained_tag("Done", "isComplete()").unwrap();
        fx.add_download(DownloadAttrs::named("a")).unwrap();
        fx.initialise().unwrap();

        // WHEN
        fx.set_constraint("Done", None).unwrap();
        fx.verify_timer(false).unwrap();
        fx.update("a", |a| a.complete = true).unwrap();
        std::thread::sleep(Duration::from_millis(100));

        // THEN
        fx.verify(Expect::tag("Done").empty()).unwrap();
    }
}
