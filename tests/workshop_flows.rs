// tests/workshop_flows.rs
// End-to-end runs of the workshop segments against in-memory fixtures.

use scrape_workshop::api::{get_table, oxford};
use scrape_workshop::extract::absolute_url;
use scrape_workshop::fetch::{MemoryFetcher, Request};
use scrape_workshop::sites::{self, Catalog};
use scrape_workshop::store;
use scrape_workshop::sweep::{FailurePolicy, Politeness};
use scrape_workshop::table::{JsonPath, Table};
use serde_json::json;

fn catalog() -> Catalog {
    Catalog {
        base: "http://books.test/catalogue/".to_string(),
        page_template: "http://books.test/catalogue/page-{page}.html".to_string(),
    }
}

fn listing(slugs: &[&str]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="{}/index.html">{}</a></h3></article></li>"#,
                slug, slug
            )
        })
        .collect();
    format!(r#"<ol class="row">{}</ol>"#, items)
}

fn book_page(title: &str) -> String {
    format!(
        r#"<div class="product_main"><h1>{}</h1></div>
           <div id="product_description"><h2>Product Description</h2></div>
           <p>About {}.</p>"#,
        title, title
    )
}

fn book_url(slug: &str) -> String {
    absolute_url("http://books.test/catalogue/", &format!("{}/index.html", slug))
}

fn books_fetcher(broken: Option<&str>) -> MemoryFetcher {
    let mut fetcher = MemoryFetcher::new()
        .page("http://books.test/catalogue/page-1.html", listing(&["sharp-objects", "soumission"]))
        .page("http://books.test/catalogue/page-2.html", listing(&["tipping-the-velvet", "set-me-free"]));

    for (slug, title) in [
        ("sharp-objects", "Sharp Objects"),
        ("soumission", "Soumission"),
        ("tipping-the-velvet", "Tipping the Velvet"),
        ("set-me-free", "Set Me Free"),
    ] {
        if Some(slug) != broken {
            fetcher = fetcher.page(&book_url(slug), book_page(title));
        }
    }
    fetcher
}

#[tokio::test]
async fn books_sweep_visits_every_book_in_order() {
    let fetcher = books_fetcher(None);

    let outcome = sites::scrape_books(&fetcher, &catalog(), 2, Politeness::default(), FailurePolicy::Abort)
        .await
        .unwrap();

    let titles: Vec<&str> = outcome.items.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Sharp Objects", "Soumission", "Tipping the Velvet", "Set Me Free"]);
    assert_eq!(outcome.items[0].url, "http://books.test/catalogue/sharp-objects/index.html");
    assert_eq!(outcome.items[0].description, "About Sharp Objects.");
    assert!(outcome.skipped.is_empty());
}

#[tokio::test]
async fn books_sweep_skips_a_broken_book_page() {
    let fetcher = books_fetcher(Some("soumission"));

    let outcome = sites::scrape_books(&fetcher, &catalog(), 2, Politeness::default(), FailurePolicy::Skip)
        .await
        .unwrap();
    assert_eq!(outcome.items.len(), 3);
    assert_eq!(outcome.skipped[0].url, book_url("soumission"));

    let aborted =
        sites::scrape_books(&fetcher, &catalog(), 2, Politeness::default(), FailurePolicy::Abort).await;
    assert!(aborted.is_err());
}

#[tokio::test]
async fn books_to_text_files_and_snapshot() {
    let fetcher = books_fetcher(None);
    let outcome = sites::scrape_books(&fetcher, &catalog(), 1, Politeness::default(), FailurePolicy::Abort)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = store::write_text_files(
        dir.path(),
        outcome.items.iter().map(|b| (b.title.as_str(), b.description.as_str())),
    )
    .unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Sharp_Objects.txt")).unwrap(),
        "About Sharp Objects."
    );

    let table = Table::from_records(&outcome.items);
    let snapshot = dir.path().join("books.json");
    store::save_snapshot(&table, &snapshot).unwrap();
    assert_eq!(store::load_snapshot(&snapshot).unwrap(), table);
}

fn quote_box(text: &str, author: &str, slug: &str, tags: &[&str]) -> String {
    let tags: String = tags.iter().map(|t| format!(r#"<a class="tag">{}</a>"#, t)).collect();
    format!(
        r#"<div class="quote"><span class="text">“{}”</span>
           <span>by <small class="author">{}</small> <a href="/author/{}">(about)</a></span>
           <div class="tags">{}</div></div>"#,
        text, author, slug, tags
    )
}

fn author_page(name: &str, born: &str) -> String {
    format!(
        r#"<h3 class="author-title">{}</h3><span class="author-born-date">{}</span>
           <span class="author-born-location">in Somewhere</span>
           <div class="author-description">Bio of {}.</div>"#,
        name, born, name
    )
}

#[tokio::test]
async fn quotes_join_author_bios_and_count_tags() {
    let fetcher = MemoryFetcher::new()
        .page(
            "http://quotes.test/page/1/",
            format!(
                "{}{}",
                quote_box("Q1", "Jane Austen", "Jane-Austen", &["love", "humor"]),
                quote_box("Q2", "Mark Twain", "Mark-Twain", &["humor"])
            ),
        )
        .page(
            "http://quotes.test/page/2/",
            quote_box("Q3", "Jane Austen", "Jane-Austen", &["love"]),
        )
        .page("http://quotes.test/author/Jane-Austen", author_page("Jane Austen", "December 16, 1775"));
    // Mark Twain's author page is missing: that link is broken.

    let quotes = sites::scrape_quotes(&fetcher, "http://quotes.test/page/{page}/", 2, Politeness::default())
        .await
        .unwrap();
    assert_eq!(quotes.len(), 3);

    let bios = sites::scrape_authors(&fetcher, &quotes, Politeness::default()).await.unwrap();
    assert_eq!(bios.items.len(), 1);
    assert_eq!(bios.skipped.len(), 1);

    let table = sites::join_authors(&quotes, &bios.items).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.column("born_date").unwrap(),
        vec!["December 16, 1775", "", "December 16, 1775"]
    );

    let tags = table.value_counts("tags", Some(sites::TAG_DELIMITER)).unwrap();
    assert_eq!(tags, vec![("humor".to_string(), 2), ("love".to_string(), 2)]);

    let austen = table.filter("author", |a| a == "Jane Austen").unwrap();
    assert_eq!(austen.column("text").unwrap(), vec!["Q1", "Q3"]);
}

#[tokio::test]
async fn dictionary_entry_flattens_to_definition_rows() {
    let credentials = oxford::OxfordCredentials {
        app_id: "id".to_string(),
        app_key: "key".to_string(),
    };
    let fetcher = MemoryFetcher::new().json(
        "https://od-api.oxforddictionaries.com/api/v2/entries/en-us/scrape",
        &json!({ "results": [{ "word": "scrape", "lexicalEntries": [
            { "lexicalCategory": { "text": "Verb" }, "entries": [{ "senses": [
                { "definitions": ["drag or pull a hard or sharp implement across a surface"] },
                { "definitions": ["copy data from a website using a computer program"] }
            ]}]}
        ]}]}),
    );

    let entry = oxford::lookup_entry(&fetcher, &credentials, "en-us", "scrape")
        .await
        .unwrap()
        .unwrap();
    let table = Table::from_records(&oxford::definitions(&entry));
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.column("definition").unwrap()[1],
        "copy data from a website using a computer program"
    );
}

#[tokio::test]
async fn generic_json_endpoint_to_csv() {
    let fetcher = MemoryFetcher::new().json(
        "https://api.test/search?q=rust",
        &json!({ "response": { "results": [
            { "id": "1", "webTitle": "Rust, again", "fields": { "byline": "A. Writer" } },
            { "id": "2", "webTitle": "Plain" }
        ]}}),
    );

    let table = get_table(
        &fetcher,
        &Request::get("https://api.test/search").query("q", "rust"),
        &JsonPath::from("response.results"),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(
        store::to_csv_string(&table),
        "id,webTitle,fields.byline\n1,\"Rust, again\",A. Writer\n2,Plain,\n"
    );
}
