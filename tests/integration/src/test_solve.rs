//! End-to-end solve tests for every execution strategy.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use setsolve_core::ExecutionStrategy;
    use setsolve_exec::{SolveError, Solver};
    use setsolve_expr::Expr;

    use crate::{Fixture, connection};

    const STRATEGIES: [ExecutionStrategy; 3] = [
        ExecutionStrategy::Script,
        ExecutionStrategy::Transaction,
        ExecutionStrategy::Sequential,
    ];

    const SEEDED: [&str; 7] = ["bar", "baz", "foo", "qux", "str", "z1", "z2"];

    fn members(value: &redis::Value) -> BTreeSet<String> {
        redis::from_redis_value(value).expect("member list")
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn nested(f: &Fixture) -> Expr {
        Expr::node(
            "SUNION",
            [
                f.key("qux").into(),
                Expr::node(
                    "SDIFF",
                    [
                        Expr::node("SINTER", [f.key("foo").into(), f.key("bar").into()]),
                        f.key("baz").into(),
                    ],
                ),
            ],
        )
    }

    async fn setup(strategy: ExecutionStrategy) -> (Fixture, Solver, redis::aio::MultiplexedConnection) {
        let mut conn = connection().await;
        let fixture = Fixture::seed(&mut conn).await;
        let solver = fixture.solver(conn.clone(), strategy).await;
        (fixture, solver, conn)
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_solve_nested_expression() {
        for strategy in STRATEGIES {
            let (fixture, solver, mut conn) = setup(strategy).await;

            let reply = solver.solve(&nested(&fixture)).await.expect("solve");

            assert_eq!(members(&reply), set(&["b", "x", "y", "z"]), "{strategy}");
            assert!(fixture.temp_keys(&mut conn).await.is_empty(), "{strategy}");
            assert_eq!(fixture.seeded_keys(&mut conn).await, SEEDED, "{strategy}");
            fixture.cleanup(&mut conn).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_solve_unnested_expression_directly() {
        for strategy in STRATEGIES {
            let (fixture, solver, mut conn) = setup(strategy).await;
            let expr = Expr::node("SINTER", [fixture.key("foo").into(), fixture.key("bar").into()]);

            let reply = solver.solve(&expr).await.expect("solve");
            let direct: BTreeSet<String> = redis::cmd("SINTER")
                .arg(fixture.key("foo"))
                .arg(fixture.key("bar"))
                .query_async(&mut conn)
                .await
                .expect("SINTER");

            assert_eq!(members(&reply), set(&["b", "c"]), "{strategy}");
            assert_eq!(members(&reply), direct, "{strategy}");
            assert!(fixture.temp_keys(&mut conn).await.is_empty(), "{strategy}");
            assert_eq!(fixture.seeded_keys(&mut conn).await, SEEDED, "{strategy}");
            fixture.cleanup(&mut conn).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_solve_json_expression() {
        let (fixture, solver, mut conn) = setup(ExecutionStrategy::Script).await;
        let input = format!(
            r#"["SDIFF", ["SUNION", "{}", "{}"], "{}"]"#,
            fixture.key("foo"),
            fixture.key("qux"),
            fixture.key("bar")
        );

        let reply = solver.solve_json(&input).await.expect("solve");

        assert_eq!(members(&reply), set(&["a", "x", "y", "z"]));
        fixture.cleanup(&mut conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_match_manual_store_commands() {
        let (fixture, solver, mut conn) = setup(ExecutionStrategy::Script).await;
        let expr = Expr::node(
            "SINTER",
            [
                Expr::node("SUNION", [fixture.key("foo").into(), fixture.key("baz").into()]),
                Expr::node("SDIFF", [fixture.key("bar").into(), fixture.key("foo").into()]),
            ],
        );

        let reply = solver.solve(&expr).await.expect("solve");

        let (t1, t2) = (fixture.key("manual1"), fixture.key("manual2"));
        let manual: BTreeSet<String> = redis::pipe()
            .cmd("SUNIONSTORE")
            .arg(&t1)
            .arg(fixture.key("foo"))
            .arg(fixture.key("baz"))
            .ignore()
            .cmd("SDIFFSTORE")
            .arg(&t2)
            .arg(fixture.key("bar"))
            .arg(fixture.key("foo"))
            .ignore()
            .cmd("SINTER")
            .arg(&t1)
            .arg(&t2)
            .query_async::<(BTreeSet<String>,)>(&mut conn)
            .await
            .expect("manual commands")
            .0;

        assert_eq!(members(&reply), manual);
        assert_eq!(members(&reply), set(&["d"]));
        fixture.cleanup(&mut conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_solve_sorted_set_expression_with_weights() {
        for strategy in STRATEGIES {
            let (fixture, solver, mut conn) = setup(strategy).await;
            let expr = Expr::node(
                "ZUNION",
                [
                    Expr::leaf(2_i64),
                    Expr::node(
                        "ZINTER",
                        [
                            Expr::leaf(2_i64),
                            fixture.key("z1").into(),
                            fixture.key("z2").into(),
                        ],
                    ),
                    fixture.key("z1").into(),
                    "WEIGHTS".into(),
                    Expr::leaf(1_i64),
                    Expr::leaf(0.5_f64),
                    "WITHSCORES".into(),
                ],
            );

            let reply = solver.solve(&expr).await.expect("solve");
            let scored: Vec<(String, f64)> = redis::from_redis_value(&reply).expect("scored members");

            // ZINTER gives b:5; adding half of z1 gives a:0.5 and b:6.
            assert_eq!(
                scored,
                vec![("a".to_owned(), 0.5), ("b".to_owned(), 6.0)],
                "{strategy}"
            );
            assert!(fixture.temp_keys(&mut conn).await.is_empty(), "{strategy}");
            fixture.cleanup(&mut conn).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_leave_no_temp_keys_on_store_error() {
        for strategy in STRATEGIES {
            let (fixture, solver, mut conn) = setup(strategy).await;
            // The first nested command succeeds, the second hits a string key.
            let expr = Expr::node(
                "SUNION",
                [
                    Expr::node("SINTER", [fixture.key("foo").into(), fixture.key("bar").into()]),
                    Expr::node("SINTER", [fixture.key("str").into(), fixture.key("foo").into()]),
                ],
            );

            let err = solver.solve(&expr).await.expect_err("wrong type must fail");

            assert!(matches!(err, SolveError::Execute(_)), "{strategy}: {err}");
            let SolveError::Execute(store) = &err else { unreachable!() };
            assert_eq!(store.code(), Some("WRONGTYPE"), "{strategy}: {err}");
            assert!(fixture.temp_keys(&mut conn).await.is_empty(), "{strategy}");
            assert_eq!(fixture.seeded_keys(&mut conn).await, SEEDED, "{strategy}");
            fixture.cleanup(&mut conn).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_reject_bare_operand_before_network() {
        let (fixture, solver, mut conn) = setup(ExecutionStrategy::Script).await;

        let err = solver
            .solve(&Expr::leaf(fixture.key("foo")))
            .await
            .expect_err("leaf must fail");
        assert!(err.is_construction());

        let err = solver.solve_json(r#""foo""#).await.expect_err("leaf must fail");
        assert!(err.is_construction());
        fixture.cleanup(&mut conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_solve_concurrently_without_collisions() {
        for strategy in STRATEGIES {
            let (fixture, solver, mut conn) = setup(strategy).await;
            let expr = nested(&fixture);

            let replies = futures::future::join_all((0..16).map(|_| solver.solve(&expr))).await;

            for reply in replies {
                let reply = reply.expect("solve");
                assert_eq!(members(&reply), set(&["b", "x", "y", "z"]), "{strategy}");
            }
            assert!(fixture.temp_keys(&mut conn).await.is_empty(), "{strategy}");
            fixture.cleanup(&mut conn).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_recover_after_script_cache_flush() {
        let (fixture, solver, mut conn) = setup(ExecutionStrategy::Script).await;
        let () = redis::cmd("SCRIPT")
            .arg("FLUSH")
            .query_async(&mut conn)
            .await
            .expect("SCRIPT FLUSH");

        let reply = solver.solve(&nested(&fixture)).await.expect("solve");

        assert_eq!(members(&reply), set(&["b", "x", "y", "z"]));
        fixture.cleanup(&mut conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running redis"]
    async fn test_should_scope_sequential_plans_per_call() {
        let (fixture, solver, mut conn) = setup(ExecutionStrategy::Sequential).await;
        let expr = nested(&fixture);

        let first = solver.plan(&expr).expect("plan");
        let second = solver.plan(&expr).expect("plan");

        assert_ne!(first.temp_keys(), second.temp_keys());
        let prefix = format!("{}:", fixture.namespace());
        assert!(first.temp_keys().iter().all(|k| k.starts_with(&prefix)));
        fixture.cleanup(&mut conn).await;
    }
}
