//! The fixed initial story graph: one revealed starting node, four hidden
//! locations and the hidden transitions between them.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{StoryChoice, StoryLink, StoryNode, StoryState};

fn node(
	id: &str,
	label: &str,
	text: &str,
	choices: &[(&str, &str)],
	color: &str,
	size: f64,
	revealed: bool,
) -> StoryNode {
	StoryNode {
		id: id.to_string(),
		label: label.to_string(),
		text: text.to_string(),
		choices: choices
			.iter()
			.map(|(target, text)| StoryChoice {
				target_id: target.to_string(),
				text: text.to_string(),
				condition: None,
			})
			.collect(),
		position: None,
		color: color.to_string(),
		size,
		visited_count: 0,
		revealed,
	}
}

fn link(source: &str, target: &str, color: &str) -> StoryLink {
	StoryLink {
		source: source.to_string(),
		target: target.to_string(),
		color: color.to_string(),
		width: 2.0,
		revealed: false,
	}
}

/// Build the canonical starting state. Everything but `start` is hidden
/// until the rule engine unlocks it.
pub fn initial_state() -> StoryState {
	let nodes = [
		node(
			"start",
			"The Anomaly",
			"You stand before a shimmering, unstable anomaly. Its surface writhes \
			 with colors you've never seen.",
			&[
				("pathA", "Follow the Path of Whispers"),
				("pathB", "Follow the Path of Echoes"),
			],
			"orange",
			20.0,
			true,
		),
		node(
			"pathA",
			"Path of Whispers",
			"The Path of Whispers leads you down a corridor of shifting sounds. \
			 Voices speak in languages you almost understand.",
			&[
				("whisperSource", "Investigate the source of whispers"),
				("start", "Return to the anomaly"),
			],
			"skyblue",
			15.0,
			false,
		),
		node(
			"pathB",
			"Path of Echoes",
			"The Path of Echoes resonates with faint, echoing sounds of events \
			 that may or may not have happened.",
			&[
				("echoChamber", "Follow the loudest echoes"),
				("start", "Return to the anomaly"),
			],
			"lightgreen",
			15.0,
			false,
		),
		node(
			"whisperSource",
			"Source of Whispers",
			"You find the source of the whispers - a small, pulsating crystal \
			 that seems to speak directly to your mind.",
			&[("pathA", "Go back to the corridor")],
			"#ADD8E6",
			12.0,
			false,
		),
		node(
			"echoChamber",
			"Echo Chamber",
			"The echoes grow louder in this chamber. You see shadowy figures \
			 moving just at the edge of your vision.",
			&[("pathB", "Retreat from the chamber")],
			"#90EE90",
			12.0,
			false,
		),
	];

	let links = vec![
		link("start", "pathA", "#777"),
		link("start", "pathB", "#777"),
		link("pathA", "whisperSource", "skyblue"),
		link("pathB", "echoChamber", "lightgreen"),
		link("whisperSource", "pathA", "skyblue"),
		link("echoChamber", "pathB", "lightgreen"),
		link("pathA", "start", "#777"),
		link("pathB", "start", "#777"),
	];

	StoryState {
		nodes: nodes
			.into_iter()
			.map(|n| (n.id.clone(), n))
			.collect::<BTreeMap<_, _>>(),
		links,
		current_node_id: "start".to_string(),
		visit_counts: BTreeMap::from([("start".to_string(), 0)]),
		flags: BTreeMap::from([("storyBegan".to_string(), false.into())]),
		history: Vec::new(),
		fired_rules: BTreeSet::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_start_is_visible_initially() {
		let state = initial_state();
		let visible = state.visible_nodes();
		assert_eq!(visible.len(), 1);
		assert_eq!(visible[0].id, "start");
		assert!(state.visible_links().is_empty());
		assert_eq!(state.visit_count("start"), 0);
		assert!(state.history.is_empty());
		assert!(state.fired_rules.is_empty());
		assert!(!state.flag_set("storyBegan"));
	}

	#[test]
	fn every_link_endpoint_exists() {
		let state = initial_state();
		for link in &state.links {
			assert!(state.nodes.contains_key(&link.source), "{}", link.source);
			assert!(state.nodes.contains_key(&link.target), "{}", link.target);
		}
	}
}
