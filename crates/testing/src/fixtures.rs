//! Test fixtures for API resources and envelopes.
//!
//! Every fixture is the JSON the API would send, so tests exercise the same
//! deserialization path as real responses. Free text is randomized with
//! `fake`; identifiers are supplied by the caller.

use fake::{
    faker::{lorem::en::Word, name::en::Name},
    Fake,
};
use serde_json::{json, Value};

/// Links attached to every error payload
pub fn error_links() -> Value {
    json!([
        { "rel": "support", "uri": "https://hornet.speedrun.com/" },
        { "rel": "report-issues", "uri": "https://github.com/speedruncom/api/issues" }
    ])
}

/// Error payload with the given status and message
pub fn error_payload(status: u16, message: &str) -> Value {
    json!({
        "status": status,
        "message": message,
        "links": error_links(),
    })
}

/// Error payload of a rejected run submission
pub fn run_error_payload(errors: &[&str]) -> Value {
    json!({
        "status": 400,
        "message": "The submitted run is invalid.",
        "errors": errors,
        "links": error_links(),
    })
}

/// `{ "data": value }`
pub fn data(value: Value) -> Value {
    json!({ "data": value })
}

/// Paginated envelope; `next` becomes the `next` link when present
pub fn page(items: Vec<Value>, next: Option<&str>) -> Value {
    let size = items.len();
    let links = match next {
        Some(uri) => json!([{ "rel": "next", "uri": uri }]),
        None => json!([]),
    };

    json!({
        "data": items,
        "pagination": {
            "offset": 0,
            "max": size,
            "size": size,
            "links": links,
        }
    })
}

/// A game
pub fn game(id: &str) -> Value {
    let name: String = Word().fake();
    json!({
        "id": id,
        "names": { "international": name, "japanese": null, "twitch": name },
        "abbreviation": id,
        "weblink": format!("https://www.speedrun.com/{}", id),
        "released": 2018,
        "romhack": false,
        "links": [{ "rel": "self", "uri": format!("https://www.speedrun.com/api/v1/games/{}", id) }],
    })
}

/// A category; `per_level` selects the category type
pub fn category(id: &str, per_level: bool) -> Value {
    json!({
        "id": id,
        "name": Word().fake::<String>(),
        "weblink": format!("https://www.speedrun.com/category/{}", id),
        "type": if per_level { "per-level" } else { "per-game" },
        "rules": null,
        "miscellaneous": false,
    })
}

/// A level
pub fn level(id: &str) -> Value {
    json!({
        "id": id,
        "name": Word().fake::<String>(),
        "weblink": format!("https://www.speedrun.com/level/{}", id),
        "rules": null,
    })
}

/// A variable
pub fn variable(id: &str) -> Value {
    json!({
        "id": id,
        "name": Word().fake::<String>(),
        "category": null,
        "mandatory": false,
        "user-defined": false,
        "is-subcategory": true,
        "values": { "values": {}, "default": null },
    })
}

/// A verified run
pub fn run(id: &str) -> Value {
    json!({
        "id": id,
        "weblink": format!("https://www.speedrun.com/run/{}", id),
        "game": "o1y9wo6q",
        "level": null,
        "category": "wkpoo02r",
        "comment": null,
        "status": { "status": "verified", "examiner": "pj0v90mx", "verify-date": "2020-01-01T00:00:00Z" },
        "players": [{ "rel": "user", "id": "zx7gd1yx" }],
        "date": "2020-01-01",
        "submitted": "2020-01-01T00:00:00Z",
        "times": { "primary": "PT20M", "primary_t": 1200.0 },
        "values": {},
    })
}

/// A run with the given variable values
pub fn run_with_values(id: &str, values: &[(&str, &str)]) -> Value {
    let mut run = run(id);
    for (variable, value) in values {
        run["values"][*variable] = json!(value);
    }
    run
}

/// A leaderboard with one ranked run per run ID
pub fn leaderboard(game: &str, category: &str, run_ids: &[&str]) -> Value {
    let runs: Vec<Value> = run_ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({ "place": i + 1, "run": run(id) }))
        .collect();

    json!({
        "weblink": format!("https://www.speedrun.com/{}#{}", game, category),
        "game": game,
        "category": category,
        "level": null,
        "timing": "realtime",
        "runs": runs,
    })
}

/// A user
pub fn user(id: &str) -> Value {
    let name: String = Name().fake();
    json!({
        "id": id,
        "names": { "international": name, "japanese": null },
        "weblink": format!("https://www.speedrun.com/user/{}", id),
        "role": "user",
        "signup": "2016-05-05T12:00:00Z",
    })
}

/// Items `"{prefix}{n}"` for `n` in `range`, built with `make`
pub fn items(prefix: &str, range: std::ops::Range<usize>, make: fn(&str) -> Value) -> Vec<Value> {
    range.map(|n| make(&format!("{}{}", prefix, n))).collect()
}
