//! Identifier extraction from share URLs and input validation

use std::sync::LazyLock;

use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("identifier pattern must compile"))
        .collect()
}

static AWEME_ID_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"/video/(\d+)", r"item_ids=(\d+)", r"aweme_id=(\d+)"]));

static SEC_UID_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"sec_uid=([^&]+)", r"/user/([A-Za-z0-9_-]+)"]));

static ROOM_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"live\.douyin\.com/(\d+)", r"room_id=(\d+)", r"web_rid=(\d+)"])
});

static SEC_UID_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^MS4wLjABAAAA[A-Za-z0-9_-]{32,64}$").expect("sec_uid pattern must compile")
});

static DOUYIN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://((www\.)?douyin\.com|v\.douyin\.com|live\.douyin\.com)")
        .expect("url pattern must compile")
});

static KEYWORD_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"']"#).expect("keyword pattern must compile"));

const MAX_KEYWORD_CHARS: usize = 100;

/// First capture of the first pattern that matches.
fn first_capture<'a>(patterns: &[Regex], input: &'a str) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn extract_aweme_id(url: &str) -> Option<&str> {
    first_capture(&AWEME_ID_PATTERNS, url)
}

pub fn extract_sec_uid(url: &str) -> Option<&str> {
    first_capture(&SEC_UID_PATTERNS, url)
}

pub fn extract_room_id(url: &str) -> Option<&str> {
    first_capture(&ROOM_ID_PATTERNS, url)
}

pub fn is_valid_sec_uid(sec_uid: &str) -> bool {
    SEC_UID_FORMAT.is_match(sec_uid)
}

/// Numeric, at least 10 digits.
pub fn is_valid_aweme_id(aweme_id: &str) -> bool {
    aweme_id.len() >= 10 && aweme_id.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_room_id(room_id: &str) -> bool {
    !room_id.is_empty() && room_id.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_douyin_url(url: &str) -> bool {
    DOUYIN_URL.is_match(url)
}

/// Accept a bare sec_uid or a profile URL carrying one.
pub fn extract_and_validate_sec_uid(input: &str) -> Option<&str> {
    if is_valid_sec_uid(input) {
        return Some(input);
    }
    // Each pattern gets a chance; a match that fails validation does not
    // stop the search.
    SEC_UID_PATTERNS
        .iter()
        .filter_map(|re| re.captures(input))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|candidate| is_valid_sec_uid(candidate))
}

/// Accept a bare aweme id or a video URL carrying one.
pub fn extract_and_validate_aweme_id(input: &str) -> Option<&str> {
    if is_valid_aweme_id(input) {
        return Some(input);
    }
    extract_aweme_id(input)
}

/// Accept a bare room id or a live URL carrying one.
pub fn extract_and_validate_room_id(input: &str) -> Option<&str> {
    if is_valid_room_id(input) {
        return Some(input);
    }
    extract_room_id(input)
}

/// Drop markup characters and cap the keyword at 100 characters.
pub fn sanitize_search_keyword(keyword: &str) -> String {
    let stripped = KEYWORD_STRIP.replace_all(keyword, "");
    stripped
        .chars()
        .take(MAX_KEYWORD_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
