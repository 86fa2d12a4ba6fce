//! Shortest paths over the road graph.
//!
//! Edge weight is the edge's rank (its position in the length-sorted edge
//! list), not its length. Ranks are unique, so totals compare cleanly as
//! integers and ties between equal sums are broken by node id.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::CampusMap;

/// Node ids from `start` to `end` inclusive, or empty when either endpoint
/// is unknown or `end` is unreachable. `start == end` yields `[start]`.
pub fn shortest_path(map: &CampusMap, start: &str, end: &str) -> Vec<String> {
    let (Some((start, _)), Some((end, _))) = (
        map.adjacency.get_key_value(start),
        map.adjacency.get_key_value(end),
    ) else {
        return Vec::new();
    };
    let start = start.as_str();
    let end = end.as_str();

    let mut dist: HashMap<&str, u64> = HashMap::with_capacity(map.adjacency.len());
    let mut prev: HashMap<&str, &str> = HashMap::new();
    let mut done: HashSet<&str> = HashSet::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start, 0);
    heap.push(Reverse((0u64, start)));

    while let Some(Reverse((d, current))) = heap.pop() {
        if !done.insert(current) {
            continue;
        }
        if current == end {
            break;
        }
        let Some(neighbors) = map.adjacency.get(current) else {
            continue;
        };
        for (next, &edge_id) in neighbors {
            let next = next.as_str();
            if done.contains(next) {
                continue;
            }
            let Some(edge) = map.edge(edge_id) else {
                continue;
            };
            let candidate = d.saturating_add(edge.rank as u64);
            if dist.get(next).map_or(true, |&known| candidate < known) {
                dist.insert(next, candidate);
                prev.insert(next, current);
                heap.push(Reverse((candidate, next)));
            }
        }
    }

    if !done.contains(end) {
        return Vec::new();
    }
    let mut path = vec![end.to_string()];
    let mut cursor = end;
    while let Some(&p) = prev.get(cursor) {
        path.push(p.to_string());
        cursor = p;
    }
    path.reverse();
    path
}

/// Total rank weight along `path`; `None` if two consecutive ids are not
/// directly connected.
pub fn path_weight(map: &CampusMap, path: &[String]) -> Option<u64> {
    path.windows(2).try_fold(0u64, |acc, pair| {
        map.edge_between(&pair[0], &pair[1])
            .map(|e| acc + e.rank as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;

    fn square(x: f32, y: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x, y),
            Vec2::new(x + 10.0, y),
            Vec2::new(x + 10.0, y + 10.0),
            Vec2::new(x, y + 10.0),
        ]
    }

    #[test]
    fn unknown_endpoints_give_empty_path() {
        let mut m = CampusMap::new();
        let a = m.add_building("A", square(0.0, 0.0), Vec2::new(10.0, 5.0));
        assert!(shortest_path(&m, &a, "B_missing").is_empty());
        assert!(shortest_path(&m, "B_missing", &a).is_empty());
    }

    #[test]
    fn start_equals_end() {
        let mut m = CampusMap::new();
        let a = m.add_building("A", square(0.0, 0.0), Vec2::new(10.0, 5.0));
        assert_eq!(shortest_path(&m, &a, &a), vec![a.clone()]);
    }

    #[test]
    fn prefers_lower_rank_sum_over_fewer_hops() {
        let mut m = CampusMap::new();
        let a = m.add_junction(Vec2::new(0.0, 0.0));
        let b = m.add_junction(Vec2::new(100.0, 0.0));
        let c = m.add_junction(Vec2::new(50.0, 1.0));
        // a-b is the longest edge (rank 2); a-c and c-b rank 0 and 1
        m.add_road(&a, &b);
        m.add_road(&a, &c);
        m.add_road(&c, &b);
        let path = shortest_path(&m, &a, &b);
        assert_eq!(path, vec![a.clone(), c.clone(), b.clone()]);
        assert_eq!(path_weight(&m, &path), Some(1));
    }

    #[test]
    fn disconnected_is_empty() {
        let mut m = CampusMap::new();
        let a = m.add_junction(Vec2::new(0.0, 0.0));
        let b = m.add_junction(Vec2::new(10.0, 0.0));
        assert!(shortest_path(&m, &a, &b).is_empty());
        assert_eq!(path_weight(&m, &[a, b]), None);
    }
}
