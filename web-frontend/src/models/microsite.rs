use serde::{Deserialize, Serialize};

/// Collection envelope used by the backend for `/links/` and `/microsites/`.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<Entry<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Entry<T> {
    pub id: i64,
    pub attributes: T,
}

/// A shortened link: `shortUrl` is the slug, `longUrl` the redirect target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttributes {
    pub short_url: String,
    pub long_url: String,
}

/// A hosted profile page associated with a slug. Fetched read-only; the
/// backend owns the schema, unknown fields are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MicrositeAttributes {
    pub short_url: String,
    pub display_name: String,
    pub description: Option<String>,
    pub background: String,
    pub image_url: String,
    pub size: String,
    pub selected_style: String,
    pub facebook_user: Option<String>,
    pub facebook_link: Option<String>,
    pub instagram_user: Option<String>,
    pub instagram_link: Option<String>,
    pub tiktok_user: Option<String>,
    pub tiktok_link: Option<String>,
    pub youtube_user: Option<String>,
    pub youtube_link: Option<String>,
    pub twitter_user: Option<String>,
    pub twitter_link: Option<String>,
    pub linked_in_user: Option<String>,
    pub linked_in_link: Option<String>,
}

/// One renderable social button; pairs with a missing user or link are
/// skipped entirely.
#[derive(Debug, Clone, Serialize)]
pub struct Social {
    pub network: &'static str,
    pub name: String,
    pub link: String,
}

impl MicrositeAttributes {
    pub fn socials(&self) -> Vec<Social> {
        let pairs = [
            ("facebook", &self.facebook_user, &self.facebook_link),
            ("instagram", &self.instagram_user, &self.instagram_link),
            ("tiktok", &self.tiktok_user, &self.tiktok_link),
            ("youtube", &self.youtube_user, &self.youtube_link),
            ("twitter", &self.twitter_user, &self.twitter_link),
            ("linkedin", &self.linked_in_user, &self.linked_in_link),
        ];

        pairs
            .into_iter()
            .filter_map(|(network, name, link)| match (name, link) {
                (Some(name), Some(link)) => Some(Social {
                    network,
                    name: name.clone(),
                    link: link.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// CSS border radius for the configured button style.
    pub fn button_radius(&self) -> &'static str {
        match self.selected_style.as_str() {
            "full" => "9999px",
            "2xl" => "1rem",
            "xl" => "0.75rem",
            "lg" => "0.5rem",
            "sm" => "0.125rem",
            _ => "0.375rem",
        }
    }

    /// CSS padding for the configured button size.
    pub fn button_padding(&self) -> &'static str {
        match self.size.as_str() {
            "sm" => "0.5rem 2.5rem",
            "lg" => "1rem 4rem",
            _ => "0.75rem 3rem",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_envelope() {
        let raw = serde_json::json!({
            "data": [
                { "id": 3, "attributes": { "shortUrl": "abc123", "longUrl": "https://example.com/page" } }
            ]
        });

        let parsed: ListResponse<LinkAttributes> = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].attributes.long_url, "https://example.com/page");
    }

    #[test]
    fn missing_data_key_is_empty() {
        let parsed: ListResponse<LinkAttributes> =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn socials_skip_half_filled_pairs() {
        let site = MicrositeAttributes {
            display_name: "Jane".to_string(),
            instagram_user: Some("jane.gram".to_string()),
            instagram_link: Some("https://instagram.com/jane.gram".to_string()),
            twitter_user: Some("janetweets".to_string()),
            // twitter_link missing: the pair must not render
            ..Default::default()
        };

        let socials = site.socials();
        assert_eq!(socials.len(), 1);
        assert_eq!(socials[0].network, "instagram");
        assert_eq!(socials[0].name, "jane.gram");
    }

    #[test]
    fn unknown_style_gets_default_radius() {
        let site = MicrositeAttributes {
            selected_style: "wobbly".to_string(),
            ..Default::default()
        };
        assert_eq!(site.button_radius(), "0.375rem");
    }
}
