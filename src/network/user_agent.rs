//! Browser-like request headers
//!
//! Search providers and many sites serve degraded or blocked pages to
//! obvious bots, so outgoing requests present as a recent desktop browser.

use rand::seq::SliceRandom;

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 14_2_1",
    "X11; Linux x86_64",
];

const CHROME_VERSIONS: &[&str] = &["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];

const FIREFOX_VERSIONS: &[&str] = &["123.0", "124.0", "125.0"];

#[derive(Clone, Copy)]
enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    fn render(self, platform: &str, version: &str) -> String {
        match self {
            Browser::Chrome => format!(
                "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{version} Safari/537.36"
            ),
            Browser::Firefox => format!(
                "Mozilla/5.0 ({platform}; rv:{version}) Gecko/20100101 Firefox/{version}"
            ),
        }
    }

    fn versions(self) -> &'static [&'static str] {
        match self {
            Browser::Chrome => CHROME_VERSIONS,
            Browser::Firefox => FIREFOX_VERSIONS,
        }
    }
}

/// Generate a random but realistic user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    // Chrome twice as likely as Firefox
    let browser = *[Browser::Chrome, Browser::Chrome, Browser::Firefox]
        .choose(&mut rng)
        .unwrap_or(&Browser::Chrome);
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let version = browser
        .versions()
        .choose(&mut rng)
        .copied()
        .unwrap_or(CHROME_VERSIONS[0]);

    browser.render(platform, version)
}

/// Accept header for HTML pages
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Accept-Language header value
pub fn accept_language(lang: &str) -> String {
    if lang == "all" || lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
