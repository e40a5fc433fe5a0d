//! Record normalization.
//!
//! The feed and the on-disk snapshot use two different JSON shapes for the
//! same logical record, divergent enough that one shared parser would obscure
//! both. Each shape gets its own total function here; both produce [`Entry`]
//! or nothing at all. The untyped `serde_json::Value` tree never leaves this
//! module.

use serde_json::{Map, Value};

use super::types::{ArtworkMap, Entry, MISSING_TEXT, MISSING_YEAR};

/// Normalize one raw record from the remote feed.
///
/// Missing scalar fields map to sentinels. A record with a missing or empty
/// thumbnails, tags, credits, or media collection is rejected outright;
/// malformed items inside those collections are skipped individually.
pub fn feed_record(raw: &Value) -> Option<Entry> {
    let record = raw.as_object()?;

    let id = text_or_missing(record.get("guid"));
    let title = text_or_missing(record.get("title"));
    let description = text_or_missing(record.get("description"));
    let program_type = text_or_missing(record.get("plprogram$programType"));
    let release_year = year_or_missing(record.get("plprogram$year"));

    let thumbnails = non_empty_object(record.get("plprogram$thumbnails"))?;
    let mut covers = ArtworkMap::new();
    let mut backdrops = ArtworkMap::new();
    for thumbnail in thumbnails.values() {
        let Some(url) = thumbnail.get("plprogram$url").and_then(Value::as_str) else {
            continue;
        };
        let Some(width) = dimension(thumbnail.get("plprogram$width")) else {
            continue;
        };
        let Some(height) = dimension(thumbnail.get("plprogram$height")) else {
            continue;
        };

        // Poster-marked URLs are covers, backdrop-marked URLs are backdrops,
        // anything else is dropped.
        if url.contains("po") || url.contains("Poster") {
            covers.insert(url.to_string(), (width, height));
        } else if url.contains("bd") {
            backdrops.insert(url.to_string(), (width, height));
        }
    }

    let tags = non_empty_array(record.get("plprogram$tags"))?;
    let mut genres = Vec::new();
    for tag in tags {
        let Some(scheme) = tag.get("plprogram$scheme").and_then(Value::as_str) else {
            continue;
        };
        if !scheme.eq_ignore_ascii_case("genre") {
            continue;
        }
        if let Some(genre) = tag.get("plprogram$title").and_then(Value::as_str) {
            genres.push(genre.to_string());
        }
    }

    let credits = non_empty_array(record.get("plprogram$credits"))?;
    let mut actors = Vec::new();
    let mut directors = Vec::new();
    for credit in credits {
        let Some(kind) = credit.get("plprogram$creditType").and_then(Value::as_str) else {
            continue;
        };
        let Some(name) = credit.get("plprogram$personName").and_then(Value::as_str) else {
            continue;
        };
        if kind.eq_ignore_ascii_case("actor") {
            actors.push(name.to_string());
        } else if kind.eq_ignore_ascii_case("director") {
            directors.push(name.to_string());
        }
    }

    let media = non_empty_array(record.get("plprogramavailability$media"))?;
    let mut trailers = Vec::new();
    for item in media {
        match item.get("plmedia$publicUrl").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => trailers.push(url.to_string()),
            _ => {}
        }
    }

    Some(Entry {
        id,
        title,
        description,
        program_type,
        release_year,
        covers,
        backdrops,
        genres,
        actors,
        directors,
        trailers,
    })
}

/// Normalize one record from a persisted snapshot.
///
/// Snapshot records were written by us, so the bar is higher: any sentinel
/// scalar or any missing/empty collection rejects the record.
pub fn snapshot_record(raw: &Value) -> Option<Entry> {
    let record = raw.as_object()?;

    let id = text_or_missing(record.get("id"));
    let title = text_or_missing(record.get("title"));
    let description = text_or_missing(record.get("description"));
    let program_type = text_or_missing(record.get("programType"));
    let release_year = year_or_missing(record.get("releaseYear"));

    if id == MISSING_TEXT
        || title == MISSING_TEXT
        || description == MISSING_TEXT
        || program_type == MISSING_TEXT
        || release_year == MISSING_YEAR
    {
        return None;
    }

    let covers = artwork_map(record.get("covers"))?;
    let backdrops = artwork_map(record.get("backdrops"))?;
    let genres = text_list(record.get("genres"))?;
    let actors = text_list(record.get("actors"))?;
    let directors = text_list(record.get("directors"))?;
    let trailers = text_list(record.get("trailers"))?;

    Some(Entry {
        id,
        title,
        description,
        program_type,
        release_year,
        covers,
        backdrops,
        genres,
        actors,
        directors,
        trailers,
    })
}

fn text_or_missing(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_TEXT.to_string())
}

fn year_or_missing(value: Option<&Value>) -> i32 {
    value
        .and_then(Value::as_i64)
        .and_then(|year| i32::try_from(year).ok())
        .unwrap_or(MISSING_YEAR)
}

fn dimension(value: Option<&Value>) -> Option<u32> {
    value.and_then(Value::as_u64).and_then(|v| u32::try_from(v).ok())
}

fn non_empty_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object).filter(|map| !map.is_empty())
}

fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array).filter(|items| !items.is_empty())
}

/// Parse a persisted url -> [width, height] map, skipping malformed pairs.
/// Empty input (or all pairs malformed) is a rejection.
fn artwork_map(value: Option<&Value>) -> Option<ArtworkMap> {
    let object = non_empty_object(value)?;
    let mut artwork = ArtworkMap::new();
    for (url, dims) in object {
        let Some(dims) = dims.as_array() else {
            continue;
        };
        let (Some(width), Some(height)) = (dimension(dims.first()), dimension(dims.get(1))) else {
            continue;
        };
        artwork.insert(url.clone(), (width, height));
    }
    if artwork.is_empty() {
        None
    } else {
        Some(artwork)
    }
}

fn text_list(value: Option<&Value>) -> Option<Vec<String>> {
    let array = non_empty_array(value)?;
    let items: Vec<String> = array
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
