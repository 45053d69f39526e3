// utm.rs — Outbound log-link annotation.
//
// Every log URL included in a notification is decorated with tracking
// parameters so clicks can be attributed to the notifier that produced
// them. Pure function, no I/O; a URL that cannot be parsed is a hard
// error for the notification because a message without a valid link must
// not be sent.

use url::Url;

use crate::error::RenderError;

/// The medium a notification goes out on, recorded as `utm_medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtmMedium {
    /// Chat channels (Slack and the like).
    Chat,
    /// Email channels.
    Email,
    /// Plain HTTP endpoints.
    Http,
}

impl UtmMedium {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtmMedium::Chat => "chat",
            UtmMedium::Email => "email",
            UtmMedium::Http => "http",
        }
    }
}

/// Append UTM tracking parameters to a log URL.
pub fn add_utm_params(log_url: &str, medium: UtmMedium) -> Result<String, RenderError> {
    let mut url = Url::parse(log_url).map_err(|err| RenderError::InvalidUrl {
        url: log_url.to_string(),
        reason: err.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("utm_campaign", "chime-build-notifiers")
        .append_pair("utm_medium", medium.as_str())
        .append_pair("utm_source", "chime");

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_all_three_params() {
        let annotated =
            add_utm_params("https://ci.example.com/builds/b-1", UtmMedium::Chat).unwrap();
        assert!(annotated.contains("utm_campaign=chime-build-notifiers"));
        assert!(annotated.contains("utm_medium=chat"));
        assert!(annotated.contains("utm_source=chime"));
    }

    #[test]
    fn preserves_existing_query_parameters() {
        let annotated =
            add_utm_params("https://ci.example.com/builds/b-1?page=2", UtmMedium::Email).unwrap();
        assert!(annotated.contains("page=2"));
        assert!(annotated.contains("utm_medium=email"));
    }

    #[test]
    fn annotation_is_pure() {
        let first = add_utm_params("https://ci.example.com/b", UtmMedium::Http).unwrap();
        let second = add_utm_params("https://ci.example.com/b", UtmMedium::Http).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unparseable_url_is_a_render_error() {
        match add_utm_params("not a url", UtmMedium::Chat) {
            Err(RenderError::InvalidUrl { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected InvalidUrl, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_url_is_a_render_error() {
        assert!(add_utm_params("", UtmMedium::Chat).is_err());
    }
}
