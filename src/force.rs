use crate::graph::Graph;
use crate::layout::{assign_edge_geometry, clamp, Layout};
use crate::types::{LayoutParams, Point};
use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// Fixed number of simulation steps; bounds worst-case latency instead of
// iterating to convergence
const TICKS: usize = 300;

// Velocity carried over between ticks after damping
const VELOCITY_RETENTION: f64 = 0.6;

// Golden-angle spiral used to seed unpositioned nodes deterministically
const SPIRAL_RADIUS: f64 = 10.0;
const SPIRAL_ANGLE: f64 = 2.399963229728653; // pi * (3 - sqrt(5))

/// Tuning knobs for the force simulation. All optional; `None` means the
/// built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repulsion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision_radius: Option<f64>,
}

impl Default for ForceConfig {
    fn default() -> Self {
        ForceConfig {
            repulsion: Some(120.0),
            link_distance: Some(60.0),
            collision_radius: Some(22.0),
        }
    }
}

/// Force-directed placement for node-link graphs.
///
/// The simulation runs on a scratch body array, never on the shared graph;
/// finished positions are merged back only into nodes that had none, so
/// re-running after a partial update never disturbs existing placements.
#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    pub config: ForceConfig,
}

impl ForceLayout {
    pub fn new() -> Self {
        ForceLayout::default()
    }

    pub fn with_config(config: ForceConfig) -> Self {
        ForceLayout { config }
    }
}

impl Layout for ForceLayout {
    fn setup(&self, g: &mut Graph, params: &LayoutParams) {
        if g.is_empty() {
            return;
        }

        let assigned = simulate(g, params, &self.config);
        for node in g.nodes.values_mut() {
            if node.pos.is_none() {
                node.pos = assigned.get(&node.id).copied();
            }
        }
        assign_edge_geometry(g);
    }
}

struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

// Runs the fixed-step simulation and returns a position for every node.
// The caller owns the merge policy; existing positions seed the bodies but
// are never written here.
fn simulate(g: &Graph, params: &LayoutParams, config: &ForceConfig) -> HashMap<Arc<str>, Point> {
    let repulsion = config.repulsion.unwrap_or(120.0);
    let link_distance = config.link_distance.unwrap_or(60.0);
    let collision_radius = config.collision_radius.unwrap_or(22.0);

    let cx = params.width / 2.0;
    let cy = params.height / 2.0;
    let min_x = params.padding;
    let max_x = params.width - params.padding;
    let min_y = params.padding;
    let max_y = params.height - params.padding;

    let ids: Vec<Arc<str>> = g.nodes.keys().cloned().collect();
    let index: HashMap<Arc<str>, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    let mut bodies: Vec<Body> = g
        .nodes
        .values()
        .enumerate()
        .map(|(i, node)| {
            let seed = node.pos.unwrap_or_else(|| {
                let r = SPIRAL_RADIUS * (0.5 + i as f64).sqrt();
                let a = SPIRAL_ANGLE * i as f64;
                Point::new(cx + r * a.cos(), cy + r * a.sin())
            });
            Body {
                x: seed.x,
                y: seed.y,
                vx: 0.0,
                vy: 0.0,
            }
        })
        .collect();

    let links: Vec<(usize, usize)> = g
        .edges
        .values()
        .map(|e| (index[&e.source], index[&e.target]))
        .collect();
    let mut degree = vec![0usize; bodies.len()];
    for &(s, t) in &links {
        degree[s] += 1;
        degree[t] += 1;
    }

    let mut alpha = 1.0_f64;
    let alpha_decay = 1.0 - 0.001_f64.powf(1.0 / TICKS as f64);

    for _ in 0..TICKS {
        alpha -= alpha * alpha_decay;

        // Link attraction along edges, biased toward the higher-degree end
        for &(s, t) in &links {
            if s == t {
                continue;
            }
            let (dx, dy) = separation(
                bodies[t].x + bodies[t].vx - bodies[s].x - bodies[s].vx,
                bodies[t].y + bodies[t].vy - bodies[s].y - bodies[s].vy,
                s,
                t,
            );
            let dist = (dx * dx + dy * dy).sqrt();
            let strength = 1.0 / degree[s].min(degree[t]).max(1) as f64;
            let pull = (dist - link_distance) / dist * alpha * strength;
            let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
            bodies[t].vx -= dx * pull * bias;
            bodies[t].vy -= dy * pull * bias;
            bodies[s].vx += dx * pull * (1.0 - bias);
            bodies[s].vy += dy * pull * (1.0 - bias);
        }

        // Pairwise repulsion
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (dx, dy) = separation(bodies[j].x - bodies[i].x, bodies[j].y - bodies[i].y, i, j);
                let d2 = dx * dx + dy * dy;
                let push = repulsion * alpha / d2;
                bodies[j].vx += dx * push;
                bodies[j].vy += dy * push;
                bodies[i].vx -= dx * push;
                bodies[i].vy -= dy * push;
            }
        }

        // Collision avoidance with a fixed exclusion radius
        let exclusion = collision_radius * 2.0;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (dx, dy) = separation(bodies[j].x - bodies[i].x, bodies[j].y - bodies[i].y, i, j);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < exclusion {
                    let shove = (exclusion - dist) / dist * 0.5;
                    bodies[j].vx += dx * shove;
                    bodies[j].vy += dy * shove;
                    bodies[i].vx -= dx * shove;
                    bodies[i].vy -= dy * shove;
                }
            }
        }

        // Centering: move the centroid onto the canvas midpoint
        let n = bodies.len() as f64;
        let (sx, sy) = bodies
            .iter()
            .fold((0.0, 0.0), |(ax, ay), b| (ax + b.x, ay + b.y));
        let (shift_x, shift_y) = (sx / n - cx, sy / n - cy);
        for body in &mut bodies {
            body.x -= shift_x;
            body.y -= shift_y;
        }

        // Integrate, damp, and keep every node inside the padded canvas
        for body in &mut bodies {
            body.vx *= VELOCITY_RETENTION;
            body.vy *= VELOCITY_RETENTION;
            body.x = clamp(body.x + body.vx, min_x, max_x);
            body.y = clamp(body.y + body.vy, min_y, max_y);
        }
    }

    ids.into_iter()
        .zip(bodies)
        .map(|(id, body)| (id, Point::new(body.x, body.y)))
        .collect()
}

// Coincident points would produce a zero-length direction; nudge them apart
// by a deterministic epsilon derived from the pair's indices.
#[inline]
fn separation(dx: f64, dy: f64, i: usize, j: usize) -> (f64, f64) {
    if dx * dx + dy * dy < 1e-12 {
        let e = 1e-6 * (i.abs_diff(j) as f64 + 1.0);
        (e, e)
    } else {
        (dx, dy)
    }
}
