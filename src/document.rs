use scraper::{ElementRef, Html, Selector};

/// The few tree queries the extractor needs from an HTML backend.
pub trait Node: Sized {
    /// Descendants matching `selector`, in document order.
    fn find_all(&self, selector: &Selector) -> Vec<Self>;

    /// Nearest ancestor element named `tag`.
    fn closest(&self, tag: &str) -> Option<Self>;

    /// Visible text with surrounding whitespace removed.
    fn trimmed_text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;
}

impl Node for ElementRef<'_> {
    fn find_all(&self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn closest(&self, tag: &str) -> Option<Self> {
        self.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == tag)
    }

    fn trimmed_text(&self) -> String {
        self.text().collect::<String>().trim().to_string()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

pub fn parse_document<S: AsRef<str>>(html: S) -> Html {
    Html::parse_document(html.as_ref())
}
