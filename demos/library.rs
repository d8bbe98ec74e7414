//! Library Catalog Example
//!
//! Resolves `libraries -> books -> author` against an in-memory catalog:
//! - Root and book resolvers are asynchronous and read the operation context
//! - Authors are host objects whose fields go through the default resolver
//! - A book with a missing author shows null propagation in the response
//!
//! Run with `RUST_LOG=resolvent=debug cargo run --example library` to see the
//! executor's tracing output.

use resolvent::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

struct Catalog {
    libraries: Vec<Value>,
    books: HashMap<String, Vec<(String, Option<String>)>>,
    authors: HashMap<String, Arc<Author>>,
}

struct Author {
    first_name: String,
    last_name: String,
}

impl ObjectValue for Author {
    fn member(&self, name: &str) -> Option<Member> {
        match name {
            "firstName" => Some(Member::value(self.first_name.as_str())),
            "lastName" => Some(Member::value(self.last_name.as_str())),
            "name" => {
                let full = format!("{} {}", self.first_name, self.last_name);
                Some(Member::value(full))
            }
            _ => None,
        }
    }
}

fn seed_catalog() -> Catalog {
    let author = |first: &str, last: &str| {
        Arc::new(Author {
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
    };

    let mut authors = HashMap::new();
    authors.insert("le-guin".to_string(), author("Ursula", "Le Guin"));
    authors.insert("calvino".to_string(), author("Italo", "Calvino"));

    let mut books = HashMap::new();
    books.insert(
        "downtown".to_string(),
        vec![
            ("The Dispossessed".to_string(), Some("le-guin".to_string())),
            ("Invisible Cities".to_string(), Some("calvino".to_string())),
        ],
    );
    books.insert(
        "riverside".to_string(),
        vec![
            ("The Lathe of Heaven".to_string(), Some("le-guin".to_string())),
            ("Beowulf".to_string(), None),
        ],
    );

    Catalog {
        libraries: vec![
            json!({ "branch": "downtown" }),
            json!({ "branch": "riverside" }),
        ],
        books,
        authors,
    }
}

fn catalog_resolvers() -> ResolverMap {
    ResolverMap::new()
        .resolver(
            "Query",
            "libraries",
            Resolver::from_async(|params: ResolverParams| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let catalog = params.context.data::<Catalog>()?;
                Ok(Value::Array(catalog.libraries.clone()))
            }),
        )
        .resolver(
            "Library",
            "books",
            Resolver::from_async(|params: ResolverParams| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let branch = match &params.parent {
                    ResolvedValue::Json(library) => library["branch"].as_str().unwrap_or_default(),
                    _ => "",
                };
                let catalog = params.context.data::<Catalog>()?;
                let books = catalog.books.get(branch).cloned().unwrap_or_default();
                Ok(books
                    .into_iter()
                    .map(|(title, author)| json!({ "title": title, "authorId": author }))
                    .collect::<Vec<Value>>())
            }),
        )
        .resolver(
            "Book",
            "author",
            Resolver::from_fn(|parent, _, ctx, _| {
                let catalog = ctx.data::<Catalog>()?;
                let author = match parent {
                    ResolvedValue::Json(book) => book["authorId"]
                        .as_str()
                        .and_then(|id| catalog.authors.get(id))
                        .cloned(),
                    _ => None,
                };
                Ok(author.map(|a| ResolvedValue::Object(a)))
            }),
        )
}

fn library_query() -> Operation {
    let author = FieldNode::new("author", TypeRef::named("Author").non_null())
        .select(FieldNode::new("name", TypeRef::named("String").non_null()));
    let book = FieldNode::new("books", TypeRef::named("Book").non_null().list())
        .select(FieldNode::new("title", TypeRef::named("String")))
        .select(author);

    Operation::query("Query").named("LibraryCatalog").select(
        FieldNode::new("libraries", TypeRef::named("Library").non_null().list())
            .select(FieldNode::new("branch", TypeRef::named("String")))
            .select(book),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = ExecutorConfig::from_yaml_str("merge_policy: fail_fast\nmax_concurrency: 8")?;
    let registry = Registry::merge_with_policy(vec![catalog_resolvers()], config.merge_policy)?;
    let executor = Executor::new(Arc::new(registry)).with_config(config);

    println!("📚 Registered resolvers:");
    for coordinate in executor.registry().coordinates() {
        println!("    {}", coordinate);
    }

    let context_factory = || async { Ok::<_, anyhow::Error>(seed_catalog()) };
    let response = executor
        .execute(&library_query(), Value::Null, &context_factory, Variables::new())
        .await;

    println!("\n🧾 Response:");
    println!("{}", serde_json::to_string_pretty(&response.into_json())?);

    Ok(())
}
