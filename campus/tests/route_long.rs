use campus::algorithms::route::path_weight;
use campus::{CampusMap, Vec2};
use std::time::Instant;

fn lcg(seed: &mut u64) -> f32 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (((*seed >> 24) & 0xFFFF_FFFF) as u32) as f32 / (u32::MAX as f32)
}

// Long-running soak test; enable with: cargo test --features long-route
#[cfg_attr(not(feature = "long-route"), ignore)]
#[test]
fn grid_edits_keep_routes_consistent() {
    let w = 24usize;
    let h = 24usize;
    let mut m = CampusMap::new();
    let mut ids = Vec::with_capacity(w * h);
    for j in 0..h {
        for i in 0..w {
            ids.push(m.add_junction(Vec2::new(i as f32 * 10.0, j as f32 * 10.0)));
        }
    }
    let mut seed = 0xC0FFEE_u64;
    for j in 0..h {
        for i in 0..w {
            let a = &ids[j * w + i];
            if i + 1 < w {
                m.add_road(a, &ids[j * w + i + 1]);
            }
            if j + 1 < h {
                m.add_road(a, &ids[(j + 1) * w + i]);
            }
            if i + 1 < w && j + 1 < h && lcg(&mut seed) < 0.2 {
                m.add_road(a, &ids[(j + 1) * w + i + 1]);
            }
        }
    }

    let t_start = Instant::now();
    for step in 0..400 {
        let a = &ids[(lcg(&mut seed) * ids.len() as f32) as usize % ids.len()];
        let b = &ids[(lcg(&mut seed) * ids.len() as f32) as usize % ids.len()];
        if step % 10 == 0 {
            if let Some(e) = m.edge_between(a, b).map(|e| e.id) {
                m.delete_edge(e);
            } else {
                m.add_road(a, b);
            }
        }
        let path = m.find_shortest_path(a, b);
        if !path.is_empty() {
            assert_eq!(path.first(), Some(a));
            assert_eq!(path.last(), Some(b));
            assert!(path_weight(&m, &path).is_some(), "step {step}: route uses a missing road");
        }
    }
    for (i, e) in m.edges().iter().enumerate() {
        assert_eq!(e.rank, i);
    }

    let back = CampusMap::from_json_value(m.to_json_value().unwrap()).unwrap();
    assert_eq!(back.edges(), m.edges());
    let (a, b) = (&ids[0], &ids[w * h - 1]);
    assert_eq!(
        path_weight(&back, &back.find_shortest_path(a, b)),
        path_weight(&m, &m.find_shortest_path(a, b))
    );
    eprintln!("soak finished in {:?}", t_start.elapsed());
}
