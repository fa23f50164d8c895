use fd_app::DogView;
use fd_app::JoinOutcome;
use fd_app::MapHead;
use fd_app::PlayerHead;
use fd_app::StateView;
use fd_db::RetiredRecord;
use fd_model::Direction;
use fd_model::Map;
use fd_model::Road;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

/// `POST /api/v1/game/join` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub user_name: String,
    pub map_id: String,
}

/// `POST /api/v1/game/player/action` body. An empty move means stop.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "move")]
    pub direction: Direction,
}

/// `POST /api/v1/game/tick` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRequest {
    pub time_delta: i64,
}

/// `GET /api/v1/game/records` query string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsQuery {
    #[serde(default)]
    pub start: usize,
    #[serde(default = "page_limit")]
    pub max_items: usize,
}

fn page_limit() -> usize {
    fd_core::RECORDS_PAGE_LIMIT
}

pub fn map_list_json(heads: &[MapHead]) -> Value {
    Value::Array(
        heads
            .iter()
            .map(|head| json!({ "id": head.id.as_str(), "name": head.name }))
            .collect(),
    )
}

fn road_json(road: &Road) -> Value {
    let start = road.start();
    let end = road.end();
    if road.is_horizontal() {
        json!({ "x0": start.x, "y0": start.y, "x1": end.x })
    } else {
        json!({ "x0": start.x, "y0": start.y, "y1": end.y })
    }
}

/// Full map description, including the verbatim `lootTypes` frontend data.
pub fn map_json(map: &Map) -> Value {
    json!({
        "id": map.id().as_str(),
        "name": map.name(),
        "roads": map.roads().iter().map(road_json).collect::<Vec<_>>(),
        "buildings": map
            .buildings()
            .iter()
            .map(|b| {
                let bounds = b.bounds();
                json!({
                    "x": bounds.position.x,
                    "y": bounds.position.y,
                    "w": bounds.size.width,
                    "h": bounds.size.height,
                })
            })
            .collect::<Vec<_>>(),
        "offices": map
            .offices()
            .iter()
            .map(|o| {
                json!({
                    "id": o.id(),
                    "x": o.position().x,
                    "y": o.position().y,
                    "offsetX": o.offset().dx,
                    "offsetY": o.offset().dy,
                })
            })
            .collect::<Vec<_>>(),
        "lootTypes": map.frontend_loot_types(),
    })
}

pub fn join_json(outcome: &JoinOutcome) -> Value {
    json!({ "authToken": outcome.token.as_str(), "playerId": outcome.player })
}

pub fn players_json(players: &[PlayerHead]) -> Value {
    Value::Object(
        players
            .iter()
            .map(|p| (p.id.to_string(), json!({ "name": p.name })))
            .collect(),
    )
}

fn dog_json(dog: &DogView) -> Value {
    json!({
        "pos": [dog.position.x, dog.position.y],
        "speed": [dog.velocity.x, dog.velocity.y],
        "dir": dog.facing.as_str(),
        "bag": dog
            .bag
            .iter()
            .map(|item| json!({ "id": item.id, "type": item.kind }))
            .collect::<Vec<_>>(),
        "score": dog.score,
    })
}

pub fn state_json(state: &StateView) -> Value {
    json!({
        "players": Value::Object(
            state
                .dogs
                .iter()
                .map(|dog| (dog.id.to_string(), dog_json(dog)))
                .collect(),
        ),
        "lostObjects": Value::Object(
            state
                .loots
                .iter()
                .map(|loot| {
                    (
                        loot.id.to_string(),
                        json!({ "type": loot.kind, "pos": [loot.position.x, loot.position.y] }),
                    )
                })
                .collect(),
        ),
    })
}

pub fn records_json(records: &[RetiredRecord]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| {
                json!({
                    "name": record.name,
                    "score": record.score,
                    "playTime": record.play_time.as_secs_f64(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_geom::Point2;
    use fd_geom::Vec2;
    use fd_model::BagItem;

    #[test]
    fn action_body_accepts_all_directions() {
        for (raw, expected) in [
            (r#"{"move":"L"}"#, Direction::Left),
            (r#"{"move":"R"}"#, Direction::Right),
            (r#"{"move":"U"}"#, Direction::Up),
            (r#"{"move":"D"}"#, Direction::Down),
            (r#"{"move":""}"#, Direction::Stop),
        ] {
            let body: ActionRequest = serde_json::from_str(raw).expect("valid body");
            assert_eq!(body.direction, expected);
        }
        assert!(serde_json::from_str::<ActionRequest>(r#"{"move":"X"}"#).is_err());
    }

    #[test]
    fn state_json_shape() {
        let state = StateView {
            dogs: vec![DogView {
                id: 1,
                position: Point2::new(0.5, 0.0),
                velocity: Vec2::new(1.0, 0.0),
                facing: Direction::Right,
                bag: vec![BagItem {
                    id: 3,
                    kind: 1,
                    value: 30,
                }],
                score: 42,
            }],
            loots: vec![fd_app::LootView {
                id: 3,
                kind: 1,
                position: Point2::new(2.0, 0.0),
            }],
        };
        let value = state_json(&state);
        assert_eq!(value["players"]["1"]["pos"], json!([0.5, 0.0]));
        assert_eq!(value["players"]["1"]["dir"], "R");
        assert_eq!(value["players"]["1"]["bag"][0], json!({ "id": 3, "type": 1 }));
        assert_eq!(value["players"]["1"]["score"], 42);
        assert_eq!(value["lostObjects"]["3"]["type"], 1);
        assert_eq!(value["lostObjects"]["3"]["pos"], json!([2.0, 0.0]));
    }

    #[test]
    fn records_json_reports_seconds() {
        let records = vec![RetiredRecord::new(
            "Alice".to_string(),
            10,
            std::time::Duration::from_millis(2500),
        )];
        let value = records_json(&records);
        assert_eq!(value[0]["name"], "Alice");
        assert_eq!(value[0]["playTime"], 2.5);
    }

    #[test]
    fn records_query_defaults() {
        let query: RecordsQuery = serde_json::from_str("{}").expect("empty query");
        assert_eq!(query.start, 0);
        assert_eq!(query.max_items, fd_core::RECORDS_PAGE_LIMIT);
    }
}
