// src/api/yelp.rs
// =============================================================================
// Yelp: business search and reviews through the Fusion API, plus a fallback
// that scrapes review text straight off the public business page.
//
// The API key is sent as "Authorization: Bearer <key>".
//
// Why a scraping fallback? The reviews endpoint only returns a few excerpts
// per business. The public page shows the full text, ten reviews per page,
// paged with "?start=0", "?start=10", ...
// =============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::get_json;
use crate::extract::select_text;
use crate::fetch::{Fetcher, Request};
use crate::sweep::{paginated_sweep, Politeness};
use crate::table::Record;

pub const YELP_API: &str = "https://api.yelp.com/v3";

/// Review paragraphs on the public page carry a language attribute; the
/// class names around them are generated and change often.
pub const REVIEW_SELECTOR: &str = r#"p[lang="en"]"#;

/// Reviews shown per page on the public site.
pub const REVIEWS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub review_count: u64,
    pub price: String,
    pub phone: String,
    pub address: String,
    pub categories: String,
    pub url: String,
}

impl Record for Business {
    const COLUMNS: &'static [&'static str] = &[
        "id", "name", "rating", "review_count", "price", "phone", "address", "categories", "url",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.rating.to_string(),
            self.review_count.to_string(),
            self.price.clone(),
            self.phone.clone(),
            self.address.clone(),
            self.categories.clone(),
            self.url.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: Option<f64>,
    pub created: String,
    pub text: String,
}

impl Record for Review {
    const COLUMNS: &'static [&'static str] = &["author", "rating", "created", "text"];

    fn row(&self) -> Vec<String> {
        vec![
            self.author.clone(),
            self.rating.map(|r| r.to_string()).unwrap_or_default(),
            self.created.clone(),
            self.text.clone(),
        ]
    }
}

// --- Wire shapes -------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    businesses: Vec<BusinessJson>,
}

#[derive(Debug, Deserialize)]
struct BusinessJson {
    id: String,
    name: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    review_count: u64,
    price: Option<String>,
    #[serde(default)]
    display_phone: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Default, Deserialize)]
struct Location {
    #[serde(default)]
    display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ReviewsEnvelope {
    #[serde(default)]
    reviews: Vec<ReviewJson>,
}

#[derive(Debug, Deserialize)]
struct ReviewJson {
    #[serde(default)]
    text: String,
    rating: Option<f64>,
    #[serde(default)]
    time_created: String,
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    name: String,
}

impl From<BusinessJson> for Business {
    fn from(b: BusinessJson) -> Self {
        Business {
            id: b.id,
            name: b.name,
            rating: b.rating,
            review_count: b.review_count,
            price: b.price.unwrap_or_default(),
            phone: b.display_phone,
            address: b.location.display_address.join(", "),
            categories: b.categories.into_iter().map(|c| c.title).collect::<Vec<_>>().join(", "),
            url: b.url,
        }
    }
}

impl From<ReviewJson> for Review {
    fn from(r: ReviewJson) -> Self {
        Review {
            author: r.user.map(|u| u.name).unwrap_or_default(),
            rating: r.rating,
            created: r.time_created,
            text: r.text,
        }
    }
}

// --- API calls ----------------------------------------------------------------

pub fn search_request(api_key: &str, term: &str, location: &str, limit: u32) -> Request {
    Request::get(format!("{}/businesses/search", YELP_API))
        .query("term", term)
        .query("location", location)
        .query("limit", limit)
        .bearer(api_key)
}

pub fn reviews_request(api_key: &str, business_id: &str) -> Request {
    Request::get(format!("{}/businesses/{}/reviews", YELP_API, business_id)).bearer(api_key)
}

pub async fn search_businesses(
    fetcher: &dyn Fetcher,
    api_key: &str,
    term: &str,
    location: &str,
    limit: u32,
) -> Result<Option<Vec<Business>>> {
    let envelope: Option<SearchEnvelope> =
        get_json(fetcher, &search_request(api_key, term, location, limit)).await?;
    Ok(envelope.map(|e| e.businesses.into_iter().map(Business::from).collect()))
}

pub async fn business_reviews(
    fetcher: &dyn Fetcher,
    api_key: &str,
    business_id: &str,
) -> Result<Option<Vec<Review>>> {
    let envelope: Option<ReviewsEnvelope> = get_json(fetcher, &reviews_request(api_key, business_id)).await?;
    Ok(envelope.map(|e| e.reviews.into_iter().map(Review::from).collect()))
}

// --- Scraping fallback ----------------------------------------------------------

/// Page URLs for the first `pages` pages of reviews of a business page.
pub fn review_page_urls(business_url: &str, pages: u32) -> Vec<String> {
    let base = business_url.split('?').next().unwrap_or(business_url);
    (0..pages)
        .map(|page| format!("{}?start={}", base, page * REVIEWS_PER_PAGE))
        .collect()
}

/// Review texts on one public page. Only the text is visible to the
/// selector, so author and rating stay empty.
pub fn parse_review_page(html: &str) -> Result<Vec<Review>> {
    Ok(select_text(html, REVIEW_SELECTOR)?
        .into_iter()
        .filter(|text| !text.is_empty())
        .map(|text| Review {
            author: String::new(),
            rating: None,
            created: String::new(),
            text,
        })
        .collect())
}

pub async fn scrape_reviews(
    fetcher: &dyn Fetcher,
    business_url: &str,
    pages: u32,
    politeness: Politeness,
) -> Result<Vec<Review>> {
    let urls = review_page_urls(business_url, pages);
    paginated_sweep(fetcher, &urls, politeness, |_, html| parse_review_page(html)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_businesses() {
        let url = search_request("K", "tacos", "Austin, TX", 2).full_url().unwrap();
        assert_eq!(
            url,
            "https://api.yelp.com/v3/businesses/search?term=tacos&location=Austin%2C+TX&limit=2"
        );

        let fetcher = MemoryFetcher::new().json(
            &url,
            &json!({ "total": 2, "businesses": [
                { "id": "veracruz", "name": "Veracruz All Natural", "rating": 4.5, "review_count": 1800,
                  "price": "$", "display_phone": "(512) 555-0100", "url": "https://www.yelp.com/biz/veracruz",
                  "location": { "display_address": ["1704 E Cesar Chavez St", "Austin, TX 78702"] },
                  "categories": [{ "alias": "tacos", "title": "Tacos" }, { "alias": "mexican", "title": "Mexican" }] },
                { "id": "nopal", "name": "Nopal" }
            ]}),
        );

        let businesses = search_businesses(&fetcher, "K", "tacos", "Austin, TX", 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(businesses.len(), 2);
        assert_eq!(businesses[0].address, "1704 E Cesar Chavez St, Austin, TX 78702");
        assert_eq!(businesses[0].categories, "Tacos, Mexican");
        assert_eq!(businesses[1].price, "");

        let sent = &fetcher.requests()[0];
        assert_eq!(sent.headers, vec![("Authorization".to_string(), "Bearer K".to_string())]);
    }

    #[tokio::test]
    async fn test_business_reviews() {
        let fetcher = MemoryFetcher::new().json(
            "https://api.yelp.com/v3/businesses/veracruz/reviews",
            &json!({ "reviews": [
                { "text": "Best migas taco...", "rating": 5, "time_created": "2024-03-01 12:00:00",
                  "user": { "name": "Sam K." } }
            ]}),
        );

        let reviews = business_reviews(&fetcher, "K", "veracruz").await.unwrap().unwrap();
        assert_eq!(reviews[0].author, "Sam K.");
        assert_eq!(reviews[0].rating, Some(5.0));
    }

    #[test]
    fn test_review_page_urls() {
        assert_eq!(
            review_page_urls("https://www.yelp.com/biz/veracruz?osq=tacos", 3),
            vec![
                "https://www.yelp.com/biz/veracruz?start=0",
                "https://www.yelp.com/biz/veracruz?start=10",
                "https://www.yelp.com/biz/veracruz?start=20",
            ]
        );
    }

    #[tokio::test]
    async fn test_scrape_reviews() {
        let page = |a: &str, b: &str| {
            format!(
                r#"<ul><li><p class="comment"><span lang="en">ignored</span></p></li>
                   <li><p class="raw__x" lang="en">{}</p></li><li><p lang="en">{}</p></li>
                   <li><p lang="es">Muy bueno</p></li></ul>"#,
                a, b
            )
        };
        let fetcher = MemoryFetcher::new()
            .page("https://www.yelp.com/biz/veracruz?start=0", page("Great tacos.", "Long line."))
            .page("https://www.yelp.com/biz/veracruz?start=10", page("Worth it.", "Cash only?"));

        let reviews = scrape_reviews(&fetcher, "https://www.yelp.com/biz/veracruz", 2, Politeness::default())
            .await
            .unwrap();
        let texts: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Great tacos.", "Long line.", "Worth it.", "Cash only?"]);
    }
}
