// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Pyramid demo
//!
//! Stacks a pyramid of boxes through the binding surface, steps it for a
//! few seconds and prints how far the top box settled. Set
//! `RUST_LOG=impulse_engine=debug` to see lifecycle events.

use impulse_engine::{BINDING_API_VERSION, PhysicsContext, Result, SolverConfig};
use impulse_engine::math::Vec2;
use tracing::info;

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,impulse_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Pyramid Demo ===\n");

    let mut ctx = PhysicsContext::for_binding(BINDING_API_VERSION)?;
    let config = SolverConfig::new().with_warm_starting(true);
    let world = ctx.create_world_with_config(Vec2::new(0.0, -10.0), config);
    ctx.set_pixel_scale(world, 32.0)?;

    let ground = ctx.create_body(100.0, 20.0, 0.0)?;
    ctx.set_center(ground, 0.0, -10.0)?;
    ctx.add_body(world, ground)?;

    let rows = 10;
    let mut top = ground;
    let mut x = Vec2::new(-6.0, 0.75);
    for row in 0..rows {
        let mut y = x;
        for _ in row..rows {
            let body = ctx.create_body(1.0, 1.0, 10.0)?;
            ctx.set_center(body, y.x, y.y)?;
            ctx.add_body(world, body)?;
            top = body;
            y += Vec2::new(1.125, 0.0);
        }
        x += Vec2::new(0.5625, 2.0);
    }

    let start = ctx.center(top)?;
    println!("Boxes: {}", ctx.world(world)?.body_count() - 1);
    println!("Top box starts at ({:.3}, {:.3})\n", start.x, start.y);

    let dt = 1.0 / 60.0;
    for frame in 0..300 {
        ctx.step(world, dt)?;
        if frame % 60 == 59 {
            let p = ctx.center(top)?;
            info!(
                time = (frame + 1) as f32 * dt,
                arbiters = ctx.arbiter_count(world)?,
                top_y = p.y,
                "frame"
            );
        }
    }

    let end = ctx.center(top)?;
    println!("Top box rests at ({:.3}, {:.3})", end.x, end.y);
    println!("Arbiters: {}", ctx.arbiter_count(world)?);

    let corners = ctx.body_polygon(top)?;
    println!("Top box corners in pixels:");
    for corner in corners {
        println!("  ({:8.2}, {:8.2})", corner.x, corner.y);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
