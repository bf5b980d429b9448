#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Ur,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ur => "ur",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "en" => Some(Language::En),
            "ur" => Some(Language::Ur),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Ur,
            Language::Ur => Language::En,
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Ur => &UR,
        }
    }
}

/// Every label the screen shows, per locale.
pub struct Strings {
    pub header: &'static str,
    pub search: &'static str,
    pub read: &'static str,
    pub load_more: &'static str,
    pub no_results: &'static str,
    pub loading: &'static str,
    pub load_failed: &'static str,
    pub opened: &'static str,
    pub hints: &'static str,
    pub hints_single: &'static str,
}

static EN: Strings = Strings {
    header: "Chapters",
    search: "Search chapters",
    read: "Read",
    load_more: "Load more",
    no_results: "No chapters match your search.",
    loading: "Loading chapters...",
    load_failed: "Could not load chapters. Press r to try again.",
    opened: "Opening",
    hints: " [ /: Search ] [ Enter: Read ] [ m: More ] [ t: Theme ] [ l: Language ] [ q: Quit ] ",
    hints_single: " [ /: Search ] [ Enter: Read ] [ m: More ] [ t: Theme ] [ q: Quit ] ",
};

static UR: Strings = Strings {
    header: "ابواب",
    search: "ابواب تلاش کریں",
    read: "پڑھیں",
    load_more: "مزید دیکھیں",
    no_results: "کوئی باب نہیں ملا۔",
    loading: "ابواب لوڈ ہو رہے ہیں...",
    load_failed: "ابواب لوڈ نہیں ہو سکے۔ دوبارہ کوشش کے لیے r دبائیں۔",
    opened: "کھولا جا رہا ہے",
    hints: " [ /: تلاش ] [ Enter: پڑھیں ] [ m: مزید ] [ t: تھیم ] [ l: زبان ] [ q: بند ] ",
    hints_single: " [ /: تلاش ] [ Enter: پڑھیں ] [ m: مزید ] [ t: تھیم ] [ q: بند ] ",
};
