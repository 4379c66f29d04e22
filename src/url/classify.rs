use crate::profile::PagePriority;
use url::Url;

const PRODUCT_WORDS: &[&str] = &[
    "product",
    "products",
    "shop",
    "store",
    "pricing",
    "collections",
    "item",
];

const NAVIGATION_WORDS: &[&str] = &[
    "about", "contact", "services", "features", "solutions", "docs", "help", "faq",
];

const UTILITY_WORDS: &[&str] = &[
    "legal", "privacy", "terms", "cookie", "cookies", "login", "signin", "signup", "register",
    "cart", "checkout", "account", "search", "tag", "feed",
];

/// Classifies a page by its path for frontier ordering
///
/// Each path segment is split on `-`, `_` and `.` and the words are matched
/// case-insensitively. Utility words win over product and navigation words,
/// so `/shop/cart` is a utility page.
///
/// # Examples
///
/// ```
/// use scan_budget::profile::PagePriority;
/// use scan_budget::url::classify_page;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/products/blue-mug").unwrap();
/// assert_eq!(classify_page(&url), PagePriority::Product);
/// ```
pub fn classify_page(url: &Url) -> PagePriority {
    let path = url.path().to_lowercase();
    let words: Vec<&str> = path
        .split('/')
        .flat_map(|segment| segment.split(['-', '_', '.']))
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() || words == ["index", "html"] {
        return PagePriority::Homepage;
    }

    let has_any = |list: &[&str]| words.iter().any(|word| list.contains(word));

    if has_any(UTILITY_WORDS) {
        PagePriority::Utility
    } else if has_any(PRODUCT_WORDS) {
        PagePriority::Product
    } else if has_any(NAVIGATION_WORDS) {
        PagePriority::Navigation
    } else {
        PagePriority::Content
    }
}
