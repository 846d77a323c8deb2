use super::types::{Anchor, Candidate, RawMatch};

/// Collapse raw matches into distinct candidates.
///
/// Greedy single pass in discovery order: a match is kept only when no kept
/// candidate lies within `radius` on both axes. This is a heuristic, not a
/// clustering; the first match seen for an icon becomes its representative.
pub fn dedup_matches(matches: &[RawMatch], radius: u32) -> Vec<Candidate> {
    let radius = radius as i64;
    let mut candidates: Vec<Candidate> = Vec::new();

    for m in matches {
        let near = candidates.iter().any(|c| {
            (m.cx as i64 - c.cx as i64).abs() < radius && (m.cy as i64 - c.cy as i64).abs() < radius
        });
        if !near {
            candidates.push(Candidate::from(m));
        }
    }

    candidates
}

/// Candidate closest to the anchor; the earliest wins ties
pub fn nearest_to(candidates: &[Candidate], anchor: Anchor) -> Option<Candidate> {
    let mut best: Option<(f64, Candidate)> = None;
    for candidate in candidates {
        let distance = candidate.distance_to(anchor);
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, *candidate)),
        }
    }
    best.map(|(_, candidate)| candidate)
}
