/// Rotten Tomatoes critic-review provider
///
/// Fetches a title's reviews page and pulls out the critic snippet
/// paragraphs. Failures are folded into the review list itself: the first
/// element of an error result carries the `Error` sentinel marker, which
/// the sentiment scorer reads as "no usable signal". Results are never
/// cached so sentiment always reflects freshly fetched text.
use std::time::Duration;

use reqwest::{header::USER_AGENT, Client as HttpClient};

use crate::{error::AppResult, services::providers::CriticReviewProvider};

/// Maximum number of snippets returned per title
const MAX_SNIPPETS: usize = 5;

#[derive(Clone)]
pub struct RottenTomatoesProvider {
    http_client: HttpClient,
    base_url: String,
}

impl RottenTomatoesProvider {
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl CriticReviewProvider for RottenTomatoesProvider {
    async fn fetch_reviews(&self, title: &str) -> Vec<String> {
        let url = format!("{}/m/{}/reviews", self.base_url, review_slug(title));

        let response = match self
            .http_client
            .get(&url)
            .header(USER_AGENT, "Mozilla/5.0")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, title, "Critic review fetch failed");
                return vec![format!("Error fetching reviews: {}", e)];
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), title, "Critic review page not found");
            return vec![format!(
                "Error: Rotten Tomatoes page not found for {}",
                title
            )];
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return vec![format!("Error fetching reviews: {}", e)],
        };

        let reviews = extract_review_texts(&html, MAX_SNIPPETS);
        if reviews.is_empty() {
            vec!["No reviews available.".to_string()]
        } else {
            reviews
        }
    }
}

/// Review-page slug for a title: lowercased, spaces to underscores
fn review_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// Pulls the text of up to `limit` `review-text` paragraphs out of a page
fn extract_review_texts(html: &str, limit: usize) -> Vec<String> {
    let mut reviews = Vec::new();
    let mut rest = html;

    while reviews.len() < limit {
        let Some(class_pos) = rest.find("class=\"review-text\"") else {
            break;
        };
        let after_class = &rest[class_pos..];
        let Some(open_end) = after_class.find('>') else {
            break;
        };
        let body = &after_class[open_end + 1..];
        let Some(close) = body.find("</p>") else {
            break;
        };

        let text = strip_tags(&body[..close]);
        if !text.is_empty() {
            reviews.push(text);
        }
        rest = &body[close + 4..];
    }

    reviews
}

/// Drops markup from a fragment and collapses whitespace
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;

    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_slug() {
        assert_eq!(review_slug("The Dark Knight"), "the_dark_knight");
        assert_eq!(review_slug("Up"), "up");
    }

    #[test]
    fn test_extract_review_texts() {
        let html = r#"
            <div><p class="review-text">A triumph.</p></div>
            <div><p class="review-text">Simply <em>wonderful</em> stuff.</p></div>
        "#;
        let reviews = extract_review_texts(html, 5);
        assert_eq!(reviews, vec!["A triumph.", "Simply wonderful stuff."]);
    }

    #[test]
    fn test_extract_review_texts_respects_limit() {
        let html = r#"<p class="review-text">one</p><p class="review-text">two</p><p class="review-text">three</p>"#;
        assert_eq!(extract_review_texts(html, 2), vec!["one", "two"]);
    }

    #[test]
    fn test_extract_review_texts_no_matches() {
        let html = "<html><body><p>Unrelated paragraph</p></body></html>";
        assert!(extract_review_texts(html, 5).is_empty());
    }

    #[test]
    fn test_extract_skips_empty_snippets() {
        let html = r#"<p class="review-text">  </p><p class="review-text">kept</p>"#;
        assert_eq!(extract_review_texts(html, 5), vec!["kept"]);
    }

    #[test]
    fn test_strip_tags_collapses_whitespace() {
        assert_eq!(
            strip_tags("A  <b>bold</b>\n claim"),
            "A bold claim"
        );
    }
}
