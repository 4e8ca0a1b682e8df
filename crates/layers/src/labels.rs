use scene::Attributes;

/// Popup text bound to an outlook region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

/// `LABEL` becomes the title (or `default_title`), `LABEL2` the body (or empty).
pub fn popup_for(attributes: &Attributes, default_title: &str) -> Popup {
    Popup {
        title: attributes
            .text("LABEL")
            .unwrap_or_else(|| default_title.to_string()),
        body: attributes.text("LABEL2").unwrap_or_default(),
    }
}
