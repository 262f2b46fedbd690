//! Tests for pagination module

use super::strategies::short_page_threshold;
use super::*;
use crate::error::Error;
use crate::path::DataPath;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// PaginationStyle Tests
// ============================================================================

#[test]
fn test_style_from_str() {
    assert_eq!(
        "page_number".parse::<PaginationStyle>().unwrap(),
        PaginationStyle::PageNumber
    );
    assert_eq!("offset".parse::<PaginationStyle>().unwrap(), PaginationStyle::Offset);
    assert_eq!("cursor".parse::<PaginationStyle>().unwrap(), PaginationStyle::Cursor);
    assert_eq!("url".parse::<PaginationStyle>().unwrap(), PaginationStyle::Url);

    let err = "link".parse::<PaginationStyle>().unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Unknown pagination type 'link'"));
}

#[test]
fn test_style_serde_names() {
    let style: PaginationStyle = serde_yaml::from_str("page_number").unwrap();
    assert_eq!(style, PaginationStyle::PageNumber);
    assert_eq!(style.to_string(), "page_number");
    assert!(serde_yaml::from_str::<PaginationStyle>("pages").is_err());
}

// ============================================================================
// PageRequest Tests
// ============================================================================

#[test]
fn test_page_request_with_param() {
    let request = PageRequest::with_param("page", 2);
    assert_eq!(request.params.get("page"), Some(&json!(2)));
    assert!(request.url.is_none());
}

#[test]
fn test_page_request_with_url() {
    let request = PageRequest::with_url("https://api.example.com/page2");
    assert!(request.params.is_empty());
    assert_eq!(request.url.as_deref(), Some("https://api.example.com/page2"));
}

#[test]
fn test_next_page_flags() {
    assert!(NextPage::Done.is_done());
    assert!(!NextPage::Done.is_continue());
    assert!(NextPage::Continue.is_continue());
}

// ============================================================================
// Page Number Paginator Tests
// ============================================================================

#[test_case(0, 0)]
#[test_case(1, 0)]
#[test_case(4, 3)]
#[test_case(5, 4)]
#[test_case(10, 8)]
#[test_case(11, 8)]
#[test_case(100, 80)]
fn test_short_page_threshold(expected: usize, threshold: usize) {
    assert_eq!(short_page_threshold(expected), threshold);
}

#[test]
fn test_page_number_paginator_initial_request() {
    let paginator = PageNumberPaginator::new("page");
    assert_eq!(paginator.next_page_number(), 1);
    assert!(paginator.expected_page_size().is_none());
    assert_eq!(paginator.next_request(), PageRequest::with_param("page", 1));
}

#[test]
fn test_page_number_paginator_captures_first_page_size() {
    let mut paginator = PageNumberPaginator::new("page");
    let body = json!({});

    let next = paginator.process_page(&body, 10).unwrap();
    assert!(next.is_continue());
    assert_eq!(paginator.expected_page_size(), Some(10));
    assert_eq!(paginator.next_page_number(), 2);

    // Later pages never change the expected size
    let next = paginator.process_page(&body, 12).unwrap();
    assert!(next.is_continue());
    assert_eq!(paginator.expected_page_size(), Some(10));
    assert_eq!(paginator.last_page_record_count(), Some(12));
    assert_eq!(paginator.next_request(), PageRequest::with_param("page", 3));
}

#[test]
fn test_page_number_paginator_tolerates_jitter() {
    let mut paginator = PageNumberPaginator::new("page");
    let body = json!({});

    paginator.process_page(&body, 10).unwrap();
    // One record short of a full page is still a full page
    assert!(paginator.process_page(&body, 9).unwrap().is_continue());
    // 8 <= floor(10 / 1.25)
    assert!(paginator.process_page(&body, 8).unwrap().is_done());
    assert_eq!(paginator.next_page_number(), 4);
}

#[test]
fn test_page_number_paginator_empty_first_page() {
    let mut paginator = PageNumberPaginator::new("page");
    assert!(paginator.process_page(&json!({}), 0).unwrap().is_done());
}

// ============================================================================
// Offset Paginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_fixed_step() {
    let mut paginator = OffsetPaginator::new("offset", Some(50));
    let body = json!({});
    assert_eq!(paginator.next_request(), PageRequest::with_param("offset", 0));

    assert!(paginator.process_page(&body, 50).unwrap().is_continue());
    assert_eq!(paginator.offset(), 50);
    assert_eq!(paginator.next_request(), PageRequest::with_param("offset", 50));

    assert!(paginator.process_page(&body, 25).unwrap().is_done());
}

#[test]
fn test_offset_paginator_advances_by_record_count() {
    let mut paginator = OffsetPaginator::new("skip", None);
    let body = json!({});

    assert!(paginator.process_page(&body, 20).unwrap().is_continue());
    assert_eq!(paginator.offset(), 20);
    assert!(paginator.process_page(&body, 20).unwrap().is_continue());
    assert_eq!(paginator.offset(), 40);
    assert!(paginator.process_page(&body, 7).unwrap().is_done());
    assert_eq!(paginator.offset(), 47);
}

#[test]
fn test_offset_paginator_stops_on_empty_page() {
    let mut paginator = OffsetPaginator::new("offset", None);
    assert!(paginator.process_page(&json!({}), 0).unwrap().is_done());
}

// ============================================================================
// Cursor Paginator Tests
// ============================================================================

#[test]
fn test_cursor_paginator_first_request_has_no_cursor() {
    let paginator = CursorPaginator::new("after", DataPath::keys(["meta", "next"]));
    assert_eq!(paginator.next_request(), PageRequest::first_page());
}

#[test]
fn test_cursor_paginator_continues() {
    let mut paginator = CursorPaginator::new("after", DataPath::keys(["meta", "next"]));
    let body = json!({"data": [{"id": 1}], "meta": {"next": "cursor_abc"}});

    let next = paginator.process_page(&body, 1).unwrap();

    assert!(next.is_continue());
    assert_eq!(paginator.next_cursor(), Some(&json!("cursor_abc")));
    assert_eq!(
        paginator.next_request(),
        PageRequest::with_param("after", "cursor_abc")
    );
}

#[test]
fn test_cursor_paginator_stops_when_cursor_absent() {
    let mut paginator = CursorPaginator::new("after", DataPath::keys(["meta", "next"]));
    paginator
        .process_page(&json!({"meta": {"next": "c1"}}), 3)
        .unwrap();

    let next = paginator.process_page(&json!({"meta": {}}), 3).unwrap();

    assert!(next.is_done());
    assert!(paginator.next_cursor().is_none());
}

#[test]
fn test_cursor_paginator_stops_on_null_cursor() {
    let mut paginator = CursorPaginator::new("after", "next");
    let next = paginator.process_page(&json!({"next": null}), 3).unwrap();
    assert!(next.is_done());
}

#[test]
fn test_cursor_paginator_passes_empty_cursor_through() {
    let mut paginator = CursorPaginator::new("after", "next");
    let next = paginator.process_page(&json!({"next": ""}), 3).unwrap();
    assert!(next.is_continue());
    assert_eq!(paginator.next_request(), PageRequest::with_param("after", ""));
}

#[test]
fn test_cursor_paginator_keeps_numeric_cursor_typed() {
    let mut paginator = CursorPaginator::new("since", "last_id");
    paginator.process_page(&json!({"last_id": 1042}), 3).unwrap();
    assert_eq!(paginator.next_request(), PageRequest::with_param("since", 1042));
}

#[test]
fn test_cursor_paginator_lookup_through_scalar_is_end_of_data() {
    let mut paginator = CursorPaginator::new("after", DataPath::keys(["page_info", "end"]));
    let next = paginator
        .process_page(&json!({"page_info": null}), 3)
        .unwrap();
    assert!(next.is_done());
}

// ============================================================================
// Next URL Paginator Tests
// ============================================================================

#[test]
fn test_next_url_paginator_follows_absolute_url() {
    let mut paginator = NextUrlPaginator::new("next", "https://api.example.com/items");
    assert_eq!(paginator.next_request(), PageRequest::first_page());

    let body = json!({"next": "https://api.example.com/items?page=2&token=x"});
    assert!(paginator.process_page(&body, 10).unwrap().is_continue());
    assert_eq!(
        paginator.next_request(),
        PageRequest::with_url("https://api.example.com/items?page=2&token=x")
    );
}

#[test]
fn test_next_url_paginator_resolves_relative_url() {
    let mut paginator = NextUrlPaginator::new(
        DataPath::keys(["links", "next"]),
        "https://api.example.com/v1/items",
    );

    let body = json!({"links": {"next": "/v1/items?cursor=abc"}});
    paginator.process_page(&body, 10).unwrap();
    assert_eq!(
        paginator.next_url(),
        Some("https://api.example.com/v1/items?cursor=abc")
    );

    let body = json!({"links": {"next": "items?cursor=def"}});
    paginator.process_page(&body, 10).unwrap();
    assert_eq!(
        paginator.next_url(),
        Some("https://api.example.com/v1/items?cursor=def")
    );
}

#[test_case(json!({}) ; "missing field")]
#[test_case(json!({"next": null}) ; "null field")]
#[test_case(json!({"next": ""}) ; "empty field")]
fn test_next_url_paginator_stops(body: serde_json::Value) {
    let mut paginator = NextUrlPaginator::new("next", "https://api.example.com/items");
    assert!(paginator.process_page(&body, 10).unwrap().is_done());
    assert!(paginator.next_url().is_none());
}

#[test]
fn test_next_url_paginator_rejects_non_string() {
    let mut paginator = NextUrlPaginator::new("next", "https://api.example.com/items");
    let err = paginator.process_page(&json!({"next": 2}), 10).unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { .. }));
}

// ============================================================================
// Strategy Tests
// ============================================================================

#[test]
fn test_strategy_build_each_style() {
    let url = "https://api.example.com/items";

    let strategy = Strategy::build(&PaginationConfig::page_number("page"), url).unwrap();
    assert_eq!(strategy.style(), PaginationStyle::PageNumber);

    let strategy = Strategy::build(&PaginationConfig::offset("offset", Some(25)), url).unwrap();
    assert_eq!(strategy.style(), PaginationStyle::Offset);

    let strategy = Strategy::build(&PaginationConfig::cursor("after", "next"), url).unwrap();
    assert_eq!(strategy.style(), PaginationStyle::Cursor);

    let strategy = Strategy::build(&PaginationConfig::next_url("next"), url).unwrap();
    assert_eq!(strategy.style(), PaginationStyle::Url);
}

#[test]
fn test_strategy_build_missing_fields() {
    let url = "https://api.example.com/items";

    let err = Strategy::build(&PaginationConfig::new(PaginationStyle::PageNumber), url)
        .unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { field } if field == "paging_param"));

    let config = PaginationConfig::new(PaginationStyle::Cursor).with_paging_param("after");
    let err = Strategy::build(&config, url).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { field } if field == "cursor_path"));

    let err = Strategy::build(&PaginationConfig::new(PaginationStyle::Url), url).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_strategy_build_rejects_zero_step() {
    let err = Strategy::build(
        &PaginationConfig::offset("offset", Some(0)),
        "https://api.example.com",
    )
    .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_strategy_build_url_style_needs_absolute_base() {
    let err = Strategy::build(&PaginationConfig::next_url("next"), "/relative").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn test_strategy_delegates_state() {
    let mut strategy = Strategy::build(
        &PaginationConfig::page_number("p"),
        "https://api.example.com",
    )
    .unwrap();
    strategy.process_page(&json!({}), 5).unwrap();
    assert_eq!(strategy.next_request(), PageRequest::with_param("p", 2));
}
