//! End-to-end execution tests
//!
//! These tests verify that:
//! - Resolved values land in the response under their response keys
//! - Non-null violations null the nearest nullable ancestor
//! - List items fail independently
//! - Output order follows the query, whatever the completion order

use resolvent::prelude::*;
use serde_json::{Value, json};
use std::time::Duration;

fn registry(maps: Vec<ResolverMap>) -> Arc<Registry> {
    Arc::new(Registry::merge(maps).expect("no conflicting resolvers"))
}

async fn run(registry: Arc<Registry>, operation: &Operation) -> Response {
    execute(
        operation,
        registry,
        json!({}),
        &OperationContext::empty(),
        Variables::new(),
    )
    .await
}

fn paths(response: &Response) -> Vec<Value> {
    response
        .errors
        .iter()
        .map(|e| serde_json::to_value(&e.path).unwrap())
        .collect()
}

// =============================================================================
// Root fields
// =============================================================================

mod root_field_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_null_int_resolves() {
        let resolvers = ResolverMap::new().resolver("Query", "numberSix", Resolver::constant(6));
        let operation = Operation::query("Query")
            .select(FieldNode::new("numberSix", TypeRef::named("Int").non_null()));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(
            response.into_json(),
            json!({ "data": { "numberSix": 6 }, "errors": [] })
        );
    }

    #[tokio::test]
    async fn test_root_non_null_violation_nulls_data() {
        let resolvers = ResolverMap::new().resolver(
            "Query",
            "numberSeven",
            Resolver::new(|_, _, _, _| Resolution::Ready(ResolvedValue::Null)),
        );
        let operation = Operation::query("Query")
            .select(FieldNode::new("numberSeven", TypeRef::named("Int").non_null()));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, None);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(paths(&response), vec![json!(["numberSeven"])]);
        assert_eq!(response.errors[0].code(), ErrorCode::NonNullViolation);
        assert_eq!(
            response.errors[0].message,
            "Cannot return null for non-nullable field Query.numberSeven."
        );
    }

    #[tokio::test]
    async fn test_nullable_null_is_not_an_error() {
        let resolvers = ResolverMap::new().resolver("Query", "maybe", Resolver::constant(None::<i32>));
        let operation =
            Operation::query("Query").select(FieldNode::new("maybe", TypeRef::named("Int")));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "maybe": null })));
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_root_value_feeds_default_resolver() {
        let operation =
            Operation::query("Query").select(FieldNode::new("version", TypeRef::named("String")));

        let response = execute(
            &operation,
            registry(vec![]),
            json!({ "version": "1.2.0" }),
            &OperationContext::empty(),
            Variables::new(),
        )
        .await;

        assert_eq!(response.data, Some(json!({ "version": "1.2.0" })));
    }

    #[tokio::test]
    async fn test_alias_is_the_response_key() {
        let resolvers = ResolverMap::new().resolver("Query", "numberSix", Resolver::constant(6));
        let operation = Operation::query("Query")
            .select(FieldNode::new("numberSix", TypeRef::named("Int")).alias("six"))
            .select(FieldNode::new("numberSix", TypeRef::named("Int")).alias("alsoSix"));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "six": 6, "alsoSix": 6 })));
    }

    #[tokio::test]
    async fn test_typename_is_answered_by_the_engine() {
        let operation = Operation::query("Query")
            .select(FieldNode::new("__typename", TypeRef::named("String").non_null()));

        let response = run(registry(vec![]), &operation).await;

        assert_eq!(response.data, Some(json!({ "__typename": "Query" })));
    }
}

// =============================================================================
// Resolver chain
// =============================================================================

mod resolver_chain_tests {
    use super::*;

    struct Author {
        name: String,
    }

    impl ObjectValue for Author {
        fn member(&self, name: &str) -> Option<Member> {
            match name {
                "name" => Some(Member::value(self.name.clone())),
                "initials" => {
                    let initials: String =
                        self.name.split_whitespace().filter_map(|w| w.chars().next()).collect();
                    Some(Member::method(move |_, _, _| Resolution::ready(initials.clone())))
                }
                _ => None,
            }
        }
    }

    fn library_resolvers() -> ResolverMap {
        ResolverMap::new()
            .resolver(
                "Query",
                "libraries",
                Resolver::constant(json!([{ "branch": "downtown" }, { "branch": "riverside" }])),
            )
            .resolver(
                "Library",
                "books",
                Resolver::from_async(|params: ResolverParams| async move {
                    let branch = match &params.parent {
                        ResolvedValue::Json(library) => {
                            library["branch"].as_str().unwrap_or_default().to_string()
                        }
                        _ => String::new(),
                    };
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    let books = match branch.as_str() {
                        "downtown" => json!([
                            { "title": "The Dispossessed", "author": "Ursula K. Le Guin" },
                            { "title": "Kindred", "author": "Octavia E. Butler" }
                        ]),
                        _ => json!([{ "title": "Dune", "author": "Frank Herbert" }]),
                    };
                    Ok::<_, anyhow::Error>(books)
                }),
            )
            .resolver(
                "Book",
                "author",
                Resolver::from_fn(|parent, _, _, _| {
                    let name = match parent {
                        ResolvedValue::Json(book) => book["author"].as_str().map(str::to_string),
                        _ => None,
                    };
                    Ok::<_, anyhow::Error>(name.map(|name| ResolvedValue::object(Author { name })))
                }),
            )
    }

    fn libraries_query() -> Operation {
        Operation::query("Query").select(
            FieldNode::new("libraries", TypeRef::named("Library").non_null().list()).select(
                FieldNode::new("books", TypeRef::named("Book").non_null().list()).select(
                    FieldNode::new("author", TypeRef::named("Author"))
                        .select(FieldNode::new("name", TypeRef::named("String").non_null())),
                ),
            ),
        )
    }

    #[tokio::test]
    async fn test_nested_chain_mirrors_query_depth() {
        let response = run(registry(vec![library_resolvers()]), &libraries_query()).await;

        assert!(response.is_ok(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data,
            Some(json!({
                "libraries": [
                    {
                        "books": [
                            { "author": { "name": "Ursula K. Le Guin" } },
                            { "author": { "name": "Octavia E. Butler" } }
                        ]
                    },
                    {
                        "books": [
                            { "author": { "name": "Frank Herbert" } }
                        ]
                    }
                ]
            }))
        );
    }

    #[tokio::test]
    async fn test_default_resolver_invokes_methods() {
        let books = FieldNode::new("books", TypeRef::named("Book").list())
            .select(FieldNode::new("title", TypeRef::named("String")))
            .select(
                FieldNode::new("author", TypeRef::named("Author"))
                    .select(FieldNode::new("initials", TypeRef::named("String"))),
            );
        let operation = Operation::query("Query")
            .select(FieldNode::new("libraries", TypeRef::named("Library").list()).select(books));

        let response = run(registry(vec![library_resolvers()]), &operation).await;

        assert_eq!(
            response.data.unwrap()["libraries"][1]["books"][0],
            json!({ "title": "Dune", "author": { "initials": "FH" } })
        );
    }

    #[tokio::test]
    async fn test_arguments_and_variables_reach_resolvers() {
        let resolvers = ResolverMap::new().resolver(
            "Query",
            "greet",
            Resolver::from_fn(|_, args, _, _| {
                let name: String = args.require("name")?;
                let punctuation: String = args.require("punctuation")?;
                Ok::<_, anyhow::Error>(format!("hello {}{}", name, punctuation))
            }),
        );
        let operation = Operation::query("Query").select(
            FieldNode::new("greet", TypeRef::named("String"))
                .argument("name", InputValue::variable("who"))
                .argument_default("punctuation", json!("!")),
        );
        let mut variables = Variables::new();
        variables.insert("who".to_string(), json!("bob"));

        let response = execute(
            &operation,
            registry(vec![resolvers]),
            json!({}),
            &OperationContext::empty(),
            variables,
        )
        .await;

        assert_eq!(response.data, Some(json!({ "greet": "hello bob!" })));
    }

    #[tokio::test]
    async fn test_info_carries_path_and_root_type() {
        let resolvers = ResolverMap::new()
            .resolver("Query", "items", Resolver::constant(json!([{}, {}])))
            .resolver(
                "Item",
                "where",
                Resolver::from_fn(|_, _, _, info| {
                    Ok::<_, anyhow::Error>(format!(
                        "{} {} {}.{}",
                        info.path, info.root_type, info.parent_type, info.field_name
                    ))
                }),
            );
        let operation = Operation::query("Query").select(
            FieldNode::new("items", TypeRef::named("Item").list())
                .select(FieldNode::new("where", TypeRef::named("String")).alias("at")),
        );

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(
            response.data,
            Some(json!({
                "items": [
                    { "at": "items.0.at Query Item.where" },
                    { "at": "items.1.at Query Item.where" }
                ]
            }))
        );
    }
}

// =============================================================================
// Null and error propagation
// =============================================================================

mod propagation_tests {
    use super::*;

    fn user_query(user_type: TypeRef) -> Operation {
        Operation::query("Query")
            .select(
                FieldNode::new("user", user_type)
                    .select(FieldNode::new("id", TypeRef::named("ID").non_null()))
                    .select(
                        FieldNode::new("profile", TypeRef::named("Profile").non_null())
                            .select(FieldNode::new("bio", TypeRef::named("String").non_null())),
                    ),
            )
            .select(FieldNode::new("version", TypeRef::named("Int")))
    }

    fn user_resolvers() -> ResolverMap {
        ResolverMap::new()
            .resolver("Query", "user", Resolver::constant(json!({ "id": "u1", "profile": {} })))
            .resolver("Query", "version", Resolver::constant(3))
            .resolver(
                "Profile",
                "bio",
                Resolver::from_fn(|_, _, _, _| {
                    Err::<Value, _>(anyhow::anyhow!("profile service timed out"))
                }),
            )
    }

    #[tokio::test]
    async fn test_failure_bubbles_to_nearest_nullable_ancestor() {
        let operation = user_query(TypeRef::named("User"));

        let response = run(registry(vec![user_resolvers()]), &operation).await;

        assert_eq!(response.data, Some(json!({ "user": null, "version": 3 })));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "profile service timed out");
        assert_eq!(response.errors[0].code(), ErrorCode::ResolverFailure);
        assert_eq!(paths(&response), vec![json!(["user", "profile", "bio"])]);
    }

    #[tokio::test]
    async fn test_failure_under_non_null_chain_nulls_data() {
        let operation = user_query(TypeRef::named("User").non_null());

        let response = run(registry(vec![user_resolvers()]), &operation).await;

        assert_eq!(response.data, None);
        assert_eq!(paths(&response), vec![json!(["user", "profile", "bio"])]);
    }

    #[tokio::test]
    async fn test_rejected_pending_value_is_a_failure() {
        let resolvers = ResolverMap::new().resolver(
            "Query",
            "slow",
            Resolver::from_async(|_| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Err::<Value, _>(anyhow::anyhow!("upstream rejected"))
            }),
        );
        let operation =
            Operation::query("Query").select(FieldNode::new("slow", TypeRef::named("String")));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "slow": null })));
        assert_eq!(response.errors[0].message, "upstream rejected");
        assert_eq!(paths(&response), vec![json!(["slow"])]);
    }

    #[tokio::test]
    async fn test_failed_field_children_do_not_run() {
        let resolvers = ResolverMap::new()
            .resolver(
                "Query",
                "user",
                Resolver::new(|_, _, _, _| Resolution::failed(anyhow::anyhow!("no user"))),
            )
            .resolver(
                "User",
                "name",
                Resolver::new(|_, _, _, _| panic!("child of a failed field must not resolve")),
            );
        let operation = Operation::query("Query").select(
            FieldNode::new("user", TypeRef::named("User"))
                .select(FieldNode::new("name", TypeRef::named("String"))),
        );

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "user": null })));
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_sibling_errors_are_all_kept_in_query_order() {
        let failing = |message: &'static str, delay: u64| {
            Resolver::from_async(move |_| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Err::<Value, _>(anyhow::anyhow!(message))
            })
        };
        let resolvers = ResolverMap::new()
            .resolver("Query", "a", failing("a failed", 30))
            .resolver("Query", "b", failing("b failed", 1))
            .resolver("Query", "c", failing("c failed", 15));
        let operation = Operation::query("Query")
            .select(FieldNode::new("a", TypeRef::named("Int")))
            .select(FieldNode::new("b", TypeRef::named("Int").non_null()))
            .select(FieldNode::new("c", TypeRef::named("Int")));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, None);
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a failed", "b failed", "c failed"]);
    }
}

// =============================================================================
// Lists
// =============================================================================

mod list_tests {
    use super::*;

    fn people_resolvers() -> ResolverMap {
        ResolverMap::new()
            .resolver(
                "Query",
                "people",
                Resolver::constant(json!([
                    { "name": "ada" },
                    { "name": null },
                    { "name": "grace" }
                ])),
            )
    }

    #[tokio::test]
    async fn test_item_failure_only_nulls_its_slot() {
        let operation = Operation::query("Query").select(
            FieldNode::new("people", TypeRef::named("Person").list())
                .select(FieldNode::new("name", TypeRef::named("String").non_null())),
        );

        let response = run(registry(vec![people_resolvers()]), &operation).await;

        assert_eq!(
            response.data,
            Some(json!({ "people": [{ "name": "ada" }, null, { "name": "grace" }] }))
        );
        assert_eq!(paths(&response), vec![json!(["people", 1, "name"])]);
    }

    #[tokio::test]
    async fn test_non_null_items_bubble_to_the_list() {
        let operation = Operation::query("Query").select(
            FieldNode::new("people", TypeRef::named("Person").non_null().list())
                .select(FieldNode::new("name", TypeRef::named("String").non_null())),
        );

        let response = run(registry(vec![people_resolvers()]), &operation).await;

        assert_eq!(response.data, Some(json!({ "people": null })));
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_list_of_scalars() {
        let resolvers =
            ResolverMap::new().resolver("Query", "tags", Resolver::constant(vec!["a", "b"]));
        let operation = Operation::query("Query")
            .select(FieldNode::new("tags", TypeRef::named("String").non_null().list()));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "tags": ["a", "b"] })));
    }

    #[tokio::test]
    async fn test_list_value_for_non_list_field_is_a_type_mismatch() {
        let resolvers =
            ResolverMap::new().resolver("Query", "tag", Resolver::constant(json!(["a", "b"])));
        let operation =
            Operation::query("Query").select(FieldNode::new("tag", TypeRef::named("String")));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "tag": null })));
        assert_eq!(response.errors[0].code(), ErrorCode::TypeMismatch);
        assert_eq!(
            response.errors[0].message,
            "Expected a single value for field Query.tag, found a list."
        );
    }

    #[tokio::test]
    async fn test_scalar_for_list_field_is_a_type_mismatch() {
        let resolvers = ResolverMap::new().resolver("Query", "tags", Resolver::constant("a"));
        let operation = Operation::query("Query")
            .select(FieldNode::new("tags", TypeRef::named("String").list().non_null()));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, None);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code(), ErrorCode::TypeMismatch);
        assert_eq!(paths(&response), vec![json!(["tags"])]);
    }
}

// =============================================================================
// Concurrency
// =============================================================================

mod concurrency_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_output_order_follows_declaration_not_completion() {
        let resolvers = ResolverMap::new()
            .resolver(
                "Query",
                "slow",
                Resolver::from_async(|_| async {
                    tokio::time::sleep(Duration::from_millis(40)).await;
                    Ok::<_, anyhow::Error>("slow")
                }),
            )
            .resolver("Query", "fast", Resolver::constant("fast"));
        let operation = Operation::query("Query")
            .select(FieldNode::new("slow", TypeRef::named("String")))
            .select(FieldNode::new("fast", TypeRef::named("String")));

        let response = run(registry(vec![resolvers]), &operation).await;

        let data = response.data.unwrap();
        let keys: Vec<&String> = data.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["slow", "fast"]);
        assert_eq!(data, json!({ "slow": "slow", "fast": "fast" }));
    }

    #[tokio::test]
    async fn test_siblings_do_not_block_each_other() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let sleeper = {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            Resolver::from_async(move |_| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(true)
                }
            })
        };

        let resolvers = ResolverMap::new()
            .resolver("Query", "a", sleeper.clone())
            .resolver("Query", "b", sleeper.clone())
            .resolver("Query", "c", sleeper);
        let operation = Operation::query("Query")
            .select(FieldNode::new("a", TypeRef::named("Boolean")))
            .select(FieldNode::new("b", TypeRef::named("Boolean")))
            .select(FieldNode::new("c", TypeRef::named("Boolean")));

        let started = Instant::now();
        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, Some(json!({ "a": true, "b": true, "c": true })));
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() < Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_sibling_work_outside_nulled_subtree_completes() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();

        let resolvers = ResolverMap::new()
            .resolver("Query", "broken", Resolver::constant(ResolvedValue::Null))
            .resolver(
                "Query",
                "slow",
                Resolver::from_async(move |_| {
                    let counter = counter.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, anyhow::Error>(1)
                    }
                }),
            );
        let operation = Operation::query("Query")
            .select(FieldNode::new("broken", TypeRef::named("Int").non_null()))
            .select(FieldNode::new("slow", TypeRef::named("Int")));

        let response = run(registry(vec![resolvers]), &operation).await;

        assert_eq!(response.data, None);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
