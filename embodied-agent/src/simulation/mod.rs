//! Arcade environments the agent is embodied in.
//!
//! Both variants share the paddle collision resolution formula from
//! `simulation/pong.py::resolve_collision_with_paddle` and
//! `simulation/catch.py::resolve_collision_with_agent` in the original
//! implementation (the two were textually identical up to which paddle object
//! they were called on).

pub mod catch;
pub mod pong;

use arena_geometry::{Shape, Vector2D};

use crate::error::Result;

/// The perimeter-normal lookup shared by every paddle collision: translate the
/// ball's center into the paddle's local frame, find the closest perimeter
/// point, read off that edge's local normal, and rotate it back to global
/// coordinates.
pub(crate) fn paddle_edge_normal(paddle_shape: &dyn Shape, ball_center: Vector2D) -> Result<Vector2D> {
    let local_center = paddle_shape.to_local(ball_center);
    let closest = paddle_shape.closest_point(local_center);
    let local_normal = paddle_shape.edge_normal(closest)?;
    Ok(local_normal.rotate(paddle_shape.orientation()))
}

/// Post-collision ball speed given the paddle's speed and the collided edge's
/// global normal: reflects the ball off the edge when it is still approaching,
/// then always adds the paddle's speed projected onto that normal.
pub(crate) fn resolve_paddle_collision(
    ball_speed: Vector2D,
    paddle_speed: Vector2D,
    edge_normal: Vector2D,
) -> Vector2D {
    let speed_adjustment = paddle_speed.projection(edge_normal);
    if ball_speed.dot(edge_normal) <= 0.0 {
        ball_speed.reflection(edge_normal) + speed_adjustment
    } else {
        ball_speed + speed_adjustment
    }
}
