// tests/wire_format.rs
use live_playground::{
    Color, Direction, GridSize, Level, LossReason, Position, Rejection, RobotAction,
    RobotCommand, RobotResponse, RobotState, TurtleAction, TurtleCommand, TurtleResponse, Value,
    Wall, WireMessage, levels,
};

fn dict(entries: Vec<(&str, Value)>) -> Value {
    Value::dictionary(entries)
}

#[test]
fn test_position_and_wall_field_names() {
    let wall = Wall::new(Position::new(1, 2), Position::new(1, 1)).unwrap();
    let value = wall.to_value();

    // Canonical order puts the smaller row first.
    let from = value.get("from").unwrap();
    assert_eq!(from.get("column"), Some(&Value::Integer(1)));
    assert_eq!(from.get("row"), Some(&Value::Integer(1)));
    assert_eq!(
        value.get("to").and_then(|v| v.get("row")),
        Some(&Value::Integer(2))
    );
}

#[test]
fn test_level_encoding_and_decoding() {
    let level = levels::level2();
    let value = level.to_value();

    assert_eq!(
        value.get("gridSize").and_then(|g| g.get("columns")),
        Some(&Value::Integer(4))
    );
    assert_eq!(value.get("robotDirection"), Some(&Value::Integer(90)));
    assert_eq!(Level::from_value(&value), Some(level));
}

#[test]
fn test_level_skips_bad_walls_but_requires_fields() {
    let good_wall = Wall::beside(Position::new(0, 0), Direction::East)
        .unwrap()
        .to_value();
    let diagonal = dict(vec![
        ("from", Position::new(0, 0).to_value()),
        ("to", Position::new(1, 1).to_value()),
    ]);
    let value = dict(vec![
        ("gridSize", GridSize::new(2, 2).to_value()),
        ("robotStart", Position::new(0, 1).to_value()),
        ("robotDirection", Value::Integer(0)),
        ("goalPosition", Position::new(1, 0).to_value()),
        ("walls", Value::Array(vec![good_wall, diagonal, Value::Integer(3)])),
    ]);

    let level = Level::from_value(&value).unwrap();
    assert_eq!(level.walls.len(), 1);
    assert_eq!(
        level.start,
        RobotState::new(Position::new(0, 1), Direction::North)
    );

    let mut missing_goal = value.clone();
    if let Value::Dictionary(map) = &mut missing_goal {
        map.remove("goalPosition");
    }
    assert_eq!(Level::from_value(&missing_goal), None);
}

#[test]
fn test_out_of_range_enumerants_decode_to_none() {
    assert_eq!(Direction::from_value(&Value::Integer(45)), None);
    assert_eq!(Direction::from_value(&Value::Integer(360)), None);
    assert_eq!(Direction::from_value(&Value::string("north")), None);
    assert_eq!(RobotAction::from_value(&Value::string("jump")), None);
    assert_eq!(LossReason::from_value(&Value::string("Fell over")), None);
    assert_eq!(Position::from_value(&Value::Array(vec![])), None);
    assert_eq!(
        Position::from_value(&dict(vec![
            ("column", Value::Real(1.0)),
            ("row", Value::Integer(0))
        ])),
        None
    );
}

#[test]
fn test_robot_messages_use_protocol_tags() {
    let command = RobotCommand::Action(RobotAction::TurnRight).to_value();
    assert_eq!(command.command_tag(), Some("RobotAction"));
    assert_eq!(command.get("Action"), Some(&Value::string("turnRight")));

    let failed =
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::HitWall).to_value();
    assert_eq!(failed.command_tag(), Some("ActionFailed"));
    assert_eq!(failed.get("Reason"), Some(&Value::string("Hit a wall")));

    let load = RobotCommand::LoadLevel(levels::level1());
    assert_eq!(RobotCommand::from_value(&load.to_value()), Some(load));

    for response in [
        RobotResponse::LevelLoaded,
        RobotResponse::Won,
        RobotResponse::NoLevelLoaded,
        RobotResponse::ActionRejected(RobotAction::Forward, Rejection::AlreadyLost),
    ] {
        assert_eq!(RobotResponse::from_value(&response.to_value()), Some(response));
    }
}

#[test]
fn test_unknown_commands_decode_to_none() {
    let unknown = dict(vec![("Command", Value::string("Teleport"))]);
    assert_eq!(RobotCommand::from_value(&unknown), None);
    assert_eq!(TurtleCommand::from_value(&unknown), None);
    assert_eq!(RobotCommand::from_value(&Value::Integer(1)), None);

    let no_action = dict(vec![("Command", Value::string("RobotAction"))]);
    assert_eq!(RobotCommand::from_value(&no_action), None);

    let negative_id = dict(vec![
        ("Command", Value::string("Added")),
        ("Turtle", Value::Integer(-1)),
    ]);
    assert_eq!(TurtleResponse::from_value(&negative_id), None);
}

#[test]
fn test_turtle_reals_accept_integers() {
    let value = dict(vec![
        ("Action", Value::string("Arc")),
        ("Radius", Value::Integer(40)),
        ("Angle", Value::Real(-270.0)),
    ]);
    assert_eq!(
        TurtleAction::from_value(&value),
        Some(TurtleAction::Arc {
            radius: 40.0,
            angle: -270.0
        })
    );

    let pen = TurtleAction::PenDown(Color::rgba(1.0, 0.5, 0.0, 0.25));
    assert_eq!(TurtleAction::from_value(&pen.to_value()), Some(pen));
}

#[test]
fn test_values_frame_as_json() {
    let value = RobotCommand::LoadLevel(levels::level3()).to_value();
    let json = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(back, value);
    assert_eq!(
        RobotCommand::from_value(&back),
        Some(RobotCommand::LoadLevel(levels::level3()))
    );

    let color: Value = serde_json::from_str(r#"{"red":1.0,"green":0,"blue":0.5,"alpha":1}"#).unwrap();
    assert_eq!(Color::from_value(&color), Some(Color::rgb(1.0, 0.0, 0.5)));
}

#[test]
fn test_extreme_coordinates_decode_without_panicking() {
    let far_wall = dict(vec![
        ("from", Position::new(i64::MAX, 0).to_value()),
        ("to", Position::new(i64::MIN, 0).to_value()),
    ]);
    assert_eq!(Wall::from_value(&far_wall), None);

    let edge_wall = dict(vec![
        ("from", Position::new(0, i64::MIN).to_value()),
        ("to", Position::new(0, i64::MIN + 1).to_value()),
    ]);
    let wall = Wall::from_value(&edge_wall).unwrap();
    assert_eq!(wall.from(), Position::new(0, i64::MIN));

    let value = dict(vec![
        ("gridSize", GridSize::new(i64::MAX, i64::MIN).to_value()),
        ("robotStart", Position::new(0, i64::MIN).to_value()),
        ("robotDirection", Value::Integer(0)),
        ("goalPosition", Position::new(i64::MAX, i64::MAX).to_value()),
        ("walls", Value::Array(vec![far_wall, edge_wall])),
    ]);
    let level = Level::from_value(&value).unwrap();
    assert_eq!(level.walls.len(), 1);
    assert_eq!(level.start.position, Position::new(0, i64::MIN));
}
