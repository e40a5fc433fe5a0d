//! Test doubles and fixtures for core components.

mod mock_feed;

pub use mock_feed::MockFeedSource;

pub mod fixtures {
    //! Canned entries and feed records for tests.

    use serde_json::{json, Value};

    use crate::catalog::{ArtworkMap, Entry};

    /// A fully valid entry with one genre and the given program type.
    pub fn entry(id: &str, genre: &str, program_type: &str) -> Entry {
        let mut covers = ArtworkMap::new();
        covers.insert(format!("http://img/{id}-po.jpg"), (200, 300));
        let mut backdrops = ArtworkMap::new();
        backdrops.insert(format!("http://img/{id}-bd.jpg"), (1920, 1080));

        Entry {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: format!("Description {id}"),
            program_type: program_type.to_string(),
            release_year: 1999,
            covers,
            backdrops,
            genres: vec![genre.to_string()],
            actors: vec!["Alice Actor".to_string()],
            directors: vec!["Dan Director".to_string()],
            trailers: vec![format!("http://trailers/{id}")],
        }
    }

    /// A fully valid raw feed record, as the remote feed would serve it.
    pub fn feed_record(id: &str) -> Value {
        json!({
            "guid": id,
            "title": "Some Title",
            "description": "Some description.",
            "plprogram$programType": "movie",
            "plprogram$year": 1999,
            "plprogram$thumbnails": {
                "orig-po": {
                    "plprogram$url": format!("http://img/{id}-po.jpg"),
                    "plprogram$width": 200,
                    "plprogram$height": 300
                },
                "orig-bd": {
                    "plprogram$url": format!("http://img/{id}-bd.jpg"),
                    "plprogram$width": 1920,
                    "plprogram$height": 1080
                }
            },
            "plprogram$tags": [
                { "plprogram$scheme": "genre", "plprogram$title": "Drama" }
            ],
            "plprogram$credits": [
                { "plprogram$creditType": "actor", "plprogram$personName": "Alice Actor" },
                { "plprogram$creditType": "director", "plprogram$personName": "Dan Director" }
            ],
            "plprogramavailability$media": [
                { "plmedia$publicUrl": format!("http://trailers/{id}") }
            ]
        })
    }
}
