//! Force simulation driving the node layout.
//!
//! A velocity-Verlet integrator with three forces applied in order each tick:
//! link springs towards a rest distance, pairwise many-body repulsion and a
//! centering translation. Energy (`alpha`) decays geometrically towards
//! `alpha_target`; once it drops below `alpha_min` the simulation stops until
//! it is restarted.

use std::f64::consts::PI;

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN2: f64 = 1.0;

/// Parameters fixed when the simulation is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
	pub link_distance: f64,
	pub link_strength: f64,
	pub charge_strength: f64,
	pub center_x: f64,
	pub center_y: f64,
}

/// Position, velocity and optional pin of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x coordinate; overrides `x` after every tick.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Linear congruential generator used for jiggling coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 4_294_967_296;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Debug)]
struct LinkForce {
	links: Vec<(usize, usize)>,
	bias: Vec<f64>,
	distance: f64,
	strength: f64,
}

impl LinkForce {
	fn new(node_count: usize, links: Vec<(usize, usize)>, distance: f64, strength: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		for &(s, t) in &links {
			degree[s] += 1;
			degree[t] += 1;
		}
		let bias = links
			.iter()
			.map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
			.collect();
		Self {
			links,
			bias,
			distance,
			strength,
		}
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut Lcg) {
		for (&(s, t), &bias) in self.links.iter().zip(&self.bias) {
			let (source, target) = (nodes[s], nodes[t]);
			let mut x = target.x + target.vx - source.x - source.vx;
			if x == 0.0 {
				x = rng.jiggle();
			}
			let mut y = target.y + target.vy - source.y - source.vy;
			if y == 0.0 {
				y = rng.jiggle();
			}
			let len = (x * x + y * y).sqrt();
			let l = (len - self.distance) / len * alpha * self.strength;
			let (x, y) = (x * l, y * l);

			nodes[t].vx -= x * bias;
			nodes[t].vy -= y * bias;
			nodes[s].vx += x * (1.0 - bias);
			nodes[s].vy += y * (1.0 - bias);
		}
	}
}

fn apply_many_body(nodes: &mut [SimNode], strength: f64, alpha: f64, rng: &mut Lcg) {
	let n = nodes.len();
	for i in 0..n {
		let (mut dvx, mut dvy) = (0.0, 0.0);
		for j in 0..n {
			if i == j {
				continue;
			}
			let mut x = nodes[j].x - nodes[i].x;
			let mut y = nodes[j].y - nodes[i].y;
			let mut l = x * x + y * y;
			if x == 0.0 {
				x = rng.jiggle();
				l += x * x;
			}
			if y == 0.0 {
				y = rng.jiggle();
				l += y * y;
			}
			if l < DISTANCE_MIN2 {
				l = (DISTANCE_MIN2 * l).sqrt();
			}
			let w = strength * alpha / l;
			dvx += x * w;
			dvy += y * w;
		}
		nodes[i].vx += dvx;
		nodes[i].vy += dvy;
	}
}

fn apply_center(nodes: &mut [SimNode], cx: f64, cy: f64) {
	if nodes.is_empty() {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let (dx, dy) = (sx / n - cx, sy / n - cy);
	for node in nodes.iter_mut() {
		node.x -= dx;
		node.y -= dy;
	}
}

/// The layout engine: owns node positions and advances them one tick at a time.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	link: LinkForce,
	charge_strength: f64,
	center: (f64, f64),
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	running: bool,
	rng: Lcg,
}

impl Simulation {
	/// Creates a running simulation over `node_count` nodes laid out on a
	/// phyllotaxis spiral. Link endpoints are node indices and must be in range.
	pub fn new(node_count: usize, links: Vec<(usize, usize)>, params: SimulationParameters) -> Self {
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let nodes = (0..node_count)
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				SimNode {
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect();

		Self {
			nodes,
			link: LinkForce::new(node_count, links, params.link_distance, params.link_strength),
			charge_strength: params.charge_strength,
			center: (params.center_x, params.center_y),
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 0.4,
			running: true,
			rng: Lcg(1),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// True while the scheduler should keep stepping.
	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Fixes a node at `(x, y)`. Out-of-range indices are ignored.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Advances the layout by one tick regardless of the running flag.
	///
	/// Free nodes keep `1 - velocity_decay` of their velocity each tick.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		self.link.apply(&mut self.nodes, alpha, &mut self.rng);
		apply_many_body(&mut self.nodes, self.charge_strength, alpha, &mut self.rng);
		apply_center(&mut self.nodes, self.center.0, self.center.1);

		let keep = 1.0 - self.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// Scheduler entry point: ticks once if running and stops when the
	/// layout has cooled. Returns whether a tick happened.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.alpha_min {
			self.running = false;
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(width: f64, height: f64) -> SimulationParameters {
		SimulationParameters {
			link_distance: 150.0,
			link_strength: 2.0,
			charge_strength: -30.0,
			center_x: width / 2.0,
			center_y: height / 2.0,
		}
	}

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn run_to_rest(sim: &mut Simulation) -> usize {
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 10_000, "simulation never settled");
		}
		ticks
	}

	#[test]
	fn single_link_settles_at_target_distance() {
		let mut sim = Simulation::new(2, vec![(0, 1)], params(800.0, 600.0));
		run_to_rest(&mut sim);
		assert!(sim.alpha() < 0.001);
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!((d - 150.0).abs() < 1.0, "distance was {d}");
	}

	#[test]
	fn layout_is_centered_on_viewport_midpoint() {
		let mut sim = Simulation::new(3, vec![(0, 1), (1, 2)], params(800.0, 600.0));
		run_to_rest(&mut sim);
		let (mx, my) = sim
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(x, y), n| (x + n.x / 3.0, y + n.y / 3.0));
		// Degree-biased link impulses shift the mean slightly after centering.
		assert!((mx - 400.0).abs() < 1e-3, "mean x was {mx}");
		assert!((my - 300.0).abs() < 1e-3, "mean y was {my}");
	}

	#[test]
	fn free_node_keeps_sixty_percent_of_its_velocity() {
		let mut sim = Simulation::new(1, Vec::new(), params(0.0, 0.0));
		let (x, y) = (sim.nodes[0].x, sim.nodes[0].y);
		sim.set_center(x, y);
		sim.nodes[0].vx = 10.0;
		sim.tick();
		let node = sim.nodes()[0];
		assert!((node.vx - 6.0).abs() < 1e-9, "vx = {}", node.vx);
		assert!((node.x - (x + node.vx)).abs() < 1e-9);
		assert_eq!(node.vy, 0.0);
	}

	#[test]
	fn cools_down_in_about_three_hundred_ticks() {
		let mut sim = Simulation::new(2, vec![(0, 1)], params(800.0, 600.0));
		let ticks = run_to_rest(&mut sim);
		assert!((295..=305).contains(&ticks), "took {ticks} ticks");
		assert!(!sim.is_running());
		assert!(!sim.step());
	}

	#[test]
	fn pinned_node_never_moves() {
		let mut sim = Simulation::new(3, vec![(0, 1), (1, 2)], params(800.0, 600.0));
		sim.pin(1, 123.0, 45.0);
		for _ in 0..200 {
			sim.tick();
			let node = sim.node(1).unwrap();
			assert_eq!((node.x, node.y), (123.0, 45.0));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn unpinned_node_is_free_again() {
		let mut sim = Simulation::new(2, vec![(0, 1)], params(800.0, 600.0));
		sim.pin(0, 0.0, 0.0);
		sim.tick();
		sim.unpin(0);
		assert!(!sim.node(0).unwrap().is_pinned());
		for _ in 0..20 {
			sim.tick();
		}
		assert_ne!((sim.node(0).unwrap().x, sim.node(0).unwrap().y), (0.0, 0.0));
	}

	#[test]
	fn unlinked_nodes_repel() {
		let mut sim = Simulation::new(2, Vec::new(), params(0.0, 0.0));
		let before = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..50 {
			sim.tick();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > before);
	}

	#[test]
	fn alpha_target_keeps_simulation_warm() {
		let mut sim = Simulation::new(2, vec![(0, 1)], params(800.0, 600.0));
		sim.set_alpha_target(0.3);
		for _ in 0..1_000 {
			assert!(sim.step());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
	}

	#[test]
	fn restart_resumes_a_settled_simulation() {
		let mut sim = Simulation::new(2, vec![(0, 1)], params(800.0, 600.0));
		run_to_rest(&mut sim);
		sim.set_alpha(0.3);
		sim.restart();
		assert!(sim.step());
	}

	#[test]
	fn empty_simulation_idles() {
		let mut sim = Simulation::new(0, Vec::new(), params(800.0, 600.0));
		run_to_rest(&mut sim);
		assert!(sim.nodes().is_empty());
	}

	#[test]
	fn coincident_nodes_are_separated() {
		let mut sim = Simulation::new(2, Vec::new(), params(0.0, 0.0));
		sim.pin(0, 5.0, 5.0);
		sim.pin(1, 5.0, 5.0);
		sim.tick();
		sim.unpin(0);
		sim.unpin(1);
		for _ in 0..10 {
			sim.tick();
		}
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!(d.is_finite() && d > 0.0);
	}
}
