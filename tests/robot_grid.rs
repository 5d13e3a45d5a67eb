// tests/robot_grid.rs
use live_playground::{
    Direction, Engine, GameState, GridSize, Level, LossReason, Position, Rejection, RobotAction,
    RobotCommand, RobotConfig, RobotEngine, RobotResponse, RobotState, Wall, levels,
};
use std::time::Duration;

fn three_by_three(walls: Vec<Wall>) -> Level {
    Level::new(
        GridSize::new(3, 3),
        RobotState::new(Position::new(0, 2), Direction::North),
        Position::new(2, 0),
        walls,
    )
}

fn loaded(level: Level) -> RobotEngine {
    let mut engine = RobotEngine::new(RobotConfig::default());
    assert_eq!(engine.load_level(level), RobotResponse::LevelLoaded);
    engine
}

#[test]
fn test_level_one_solution_wins() {
    let mut engine = loaded(three_by_three(vec![]));

    let actions = [
        RobotAction::Forward,
        RobotAction::Forward,
        RobotAction::TurnRight,
        RobotAction::Forward,
        RobotAction::Forward,
    ];
    let responses: Vec<_> = actions.iter().map(|a| engine.act(*a)).collect();

    assert_eq!(responses.last(), Some(&RobotResponse::Won));
    assert_eq!(
        engine.robot().map(|r| r.position),
        Some(Position::new(2, 0))
    );
    assert_eq!(engine.game_state(), Some(GameState::Won));
    for r in &responses[..4] {
        assert!(matches!(r, RobotResponse::ActionCompleted(_)), "got {r:?}");
    }
}

#[test]
fn test_leaving_the_grid_is_lost() {
    let mut engine = loaded(three_by_three(vec![]));
    engine.act(RobotAction::Forward);
    engine.act(RobotAction::Forward);
    assert_eq!(
        engine.robot().map(|r| r.position),
        Some(Position::new(0, 0))
    );

    let response = engine.act(RobotAction::Forward);

    assert_eq!(
        response,
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::OutOfBounds)
    );
    assert_eq!(
        engine.game_state(),
        Some(GameState::Lost(LossReason::OutOfBounds))
    );
    // The failed step does not move the robot.
    assert_eq!(
        engine.robot().map(|r| r.position),
        Some(Position::new(0, 0))
    );
}

#[test]
fn test_wall_blocks_forward() {
    let wall = Wall::new(Position::new(1, 2), Position::new(1, 1)).unwrap();
    let mut level = three_by_three(vec![wall]);
    level.start = RobotState::new(Position::new(1, 2), Direction::North);
    let mut engine = loaded(level);

    let response = engine.act(RobotAction::Forward);

    assert_eq!(
        response,
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::HitWall)
    );
    assert_eq!(
        engine.game_state(),
        Some(GameState::Lost(LossReason::HitWall))
    );
}

#[test]
fn test_wall_on_boundary_takes_precedence() {
    let boundary = Wall::beside(Position::new(0, 0), Direction::North).unwrap();
    let mut level = three_by_three(vec![boundary]);
    level.start = RobotState::new(Position::new(0, 0), Direction::North);
    let mut engine = loaded(level);

    assert_eq!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::HitWall)
    );
}

#[test]
fn test_actions_after_game_over_are_rejected() {
    let mut engine = RobotEngine::new(RobotConfig::default());
    assert_eq!(
        engine.act(RobotAction::TurnLeft),
        RobotResponse::ActionRejected(RobotAction::TurnLeft, Rejection::NoLevel)
    );

    engine.load_level(three_by_three(vec![]));
    engine.act(RobotAction::TurnLeft);
    assert!(matches!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionFailed(_, LossReason::OutOfBounds)
    ));
    let before = engine.robot();
    assert_eq!(
        engine.act(RobotAction::TurnRight),
        RobotResponse::ActionRejected(RobotAction::TurnRight, Rejection::AlreadyLost)
    );
    assert_eq!(engine.robot(), before, "rejected actions must not move the robot");

    engine.reset();
    for a in [
        RobotAction::Forward,
        RobotAction::Forward,
        RobotAction::TurnRight,
        RobotAction::Forward,
        RobotAction::Forward,
    ] {
        engine.act(a);
    }
    assert_eq!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionRejected(RobotAction::Forward, Rejection::AlreadyWon)
    );
}

#[test]
fn test_reset_restores_start_and_requires_level() {
    let mut engine = RobotEngine::new(RobotConfig::default());
    assert_eq!(engine.reset(), RobotResponse::NoLevelLoaded);
    assert_eq!(engine.game_state(), None);

    engine.load_level(three_by_three(vec![]));
    engine.act(RobotAction::TurnRight);
    engine.act(RobotAction::Forward);
    assert_eq!(engine.reset(), RobotResponse::LevelLoaded);
    assert_eq!(
        engine.robot(),
        Some(RobotState::new(Position::new(0, 2), Direction::North))
    );
    assert_eq!(engine.game_state(), Some(GameState::Playing));
}

#[test]
fn test_load_level_is_idempotent() {
    let mut engine = RobotEngine::new(RobotConfig::default());
    engine.load_level(levels::level2());
    let first = engine.robot();
    engine.act(RobotAction::TurnLeft);
    engine.load_level(levels::level2());
    engine.load_level(levels::level2());

    assert_eq!(engine.robot(), first);
    assert_eq!(engine.game_state(), Some(GameState::Playing));
}

#[test]
fn test_turns_form_a_cycle_of_four() {
    for start in Direction::ALL {
        let mut right = start;
        let mut left = start;
        for _ in 0..4 {
            right = right.turned_right();
            left = left.turned_left();
        }
        assert_eq!(right, start);
        assert_eq!(left, start);
        assert_eq!(start.turned_right().turned_left(), start);
        assert_eq!(
            start.turned_right().degrees(),
            (start.degrees() + 90) % 360
        );
    }
}

#[test]
fn test_walls_are_unordered_and_adjacent() {
    let a = Position::new(2, 3);
    for d in Direction::ALL {
        let b = a.moved(d).unwrap();
        assert_eq!(Wall::new(a, b), Wall::new(b, a));
        assert_eq!(Wall::new(a, b), Wall::beside(a, d));
        assert!(Wall::beside(a, d).unwrap().blocks(a, d));
    }
    assert_eq!(Wall::new(a, a), None);
    assert_eq!(Wall::new(a, Position::new(3, 4)), None);
    assert_eq!(Wall::new(a, Position::new(2, 5)), None);
}

#[test]
fn test_coordinate_extremes_do_not_overflow() {
    let corner = Position::new(i64::MIN, i64::MAX);
    assert_eq!(corner.moved(Direction::West), None);
    assert_eq!(corner.moved(Direction::South), None);
    assert_eq!(
        corner.moved(Direction::North),
        Some(Position::new(i64::MIN, i64::MAX - 1))
    );
    assert_eq!(Wall::beside(corner, Direction::West), None);

    let far_apart = (Position::new(i64::MAX, 0), Position::new(i64::MIN, 0));
    assert_eq!(Wall::new(far_apart.0, far_apart.1), None);
    assert_eq!(
        Wall::new(Position::new(i64::MAX, i64::MAX), Position::new(i64::MIN, i64::MIN)),
        None
    );
    assert!(Wall::new(Position::new(i64::MAX - 1, 0), Position::new(i64::MAX, 0)).is_some());
}

#[test]
fn test_step_off_the_coordinate_space_is_out_of_bounds() {
    let level = Level::new(
        GridSize::new(3, 3),
        RobotState::new(Position::new(0, i64::MIN), Direction::North),
        Position::new(2, 0),
        [],
    );
    let mut engine = loaded(level);

    assert_eq!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::OutOfBounds)
    );
    assert_eq!(
        engine.robot().map(|r| r.position),
        Some(Position::new(0, i64::MIN))
    );
}

#[test]
fn test_level_three_maze_walls() {
    let level = levels::level3();
    let mut engine = loaded(level);
    // Straight up from (0,4) is open; (1,3) north is walled.
    assert_eq!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionCompleted(RobotAction::Forward)
    );
    engine.act(RobotAction::TurnRight);
    engine.act(RobotAction::Forward);
    engine.act(RobotAction::TurnLeft);
    assert_eq!(
        engine.act(RobotAction::Forward),
        RobotResponse::ActionFailed(RobotAction::Forward, LossReason::HitWall)
    );
}

#[test]
fn test_engine_paces_only_successful_moves() {
    let config = RobotConfig {
        step_duration: Duration::from_millis(250),
    };
    let mut engine = RobotEngine::new(config);

    let reply = engine.handle(RobotCommand::LoadLevel(levels::level1()));
    assert_eq!(reply.animation, Duration::ZERO);

    let reply = engine.handle(RobotCommand::Action(RobotAction::TurnLeft));
    assert_eq!(reply.animation, Duration::from_millis(250));

    let reply = engine.handle(RobotCommand::Action(RobotAction::Forward));
    assert_eq!(reply.animation, Duration::ZERO);
    assert!(matches!(reply.response, RobotResponse::ActionFailed(..)));
}
