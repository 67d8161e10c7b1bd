//! Crowding distance and DECD archive eviction.
//!
//! DECD (dynamic elimination by crowding distance) removes archive members
//! one at a time, always the most crowded, and after each removal refreshes
//! only the neighbour gaps around the vacated rank instead of re-sorting.
//!
//! Per objective, an interior member's gap is
//! `|next - prev| / |max - min|` over the members sorted by that objective.
//! The first and last member of each ordering get [`SENTINEL`], and a
//! member's total is [`SENTINEL`] as soon as one objective assigns it.

use std::cmp::Ordering;

use super::types::Agent;

/// Distance assigned to the extreme members of an objective.
pub const SENTINEL: f64 = f64::INFINITY;

/// Incrementally maintained crowding distances for a set of members.
struct CrowdingTable {
    /// `values[member][objective]`.
    values: Vec<Vec<f64>>,
    /// `order[objective][rank]` = member, ascending by value.
    order: Vec<Vec<usize>>,
    /// `rank[objective][member]` = position of member in `order[objective]`.
    rank: Vec<Vec<usize>>,
    /// `distance[member][objective]`.
    distance: Vec<Vec<f64>>,
}

impl CrowdingTable {
    fn new(values: Vec<Vec<f64>>) -> Self {
        let n = values.len();
        let m = values.first().map_or(0, Vec::len);

        let mut table = Self {
            values,
            order: Vec::with_capacity(m),
            rank: Vec::with_capacity(m),
            distance: vec![vec![0.0; m]; n],
        };

        for obj in 0..m {
            let mut order: Vec<usize> = (0..n).collect();
            // Stable: equal values keep member order.
            order.sort_by(|&a, &b| {
                table.values[a][obj]
                    .partial_cmp(&table.values[b][obj])
                    .unwrap_or(Ordering::Equal)
            });
            table.order.push(order);
            table.rank.push(vec![0; n]);
            table.reindex(obj);
            table.refresh_objective(obj);
        }

        table
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn num_objectives(&self) -> usize {
        self.order.len()
    }

    fn reindex(&mut self, obj: usize) {
        for (r, &member) in self.order[obj].iter().enumerate() {
            self.rank[obj][member] = r;
        }
    }

    /// Normalized neighbour gap of the member at rank `r` for `obj`.
    fn gap(&self, obj: usize, r: usize) -> f64 {
        let order = &self.order[obj];
        let n = order.len();
        if r == 0 || r + 1 >= n {
            return SENTINEL;
        }
        let value = |k: usize| self.values[order[k]][obj];
        let range = (value(n - 1) - value(0)).abs();
        if range > 0.0 {
            (value(r + 1) - value(r - 1)).abs() / range
        } else {
            0.0
        }
    }

    fn refresh_rank(&mut self, obj: usize, r: usize) {
        if r < self.order[obj].len() {
            let member = self.order[obj][r];
            self.distance[member][obj] = self.gap(obj, r);
        }
    }

    fn refresh_objective(&mut self, obj: usize) {
        for r in 0..self.order[obj].len() {
            self.refresh_rank(obj, r);
        }
    }

    fn total(&self, member: usize) -> f64 {
        let mut total = 0.0;
        for &d in &self.distance[member] {
            if d == SENTINEL {
                return SENTINEL;
            }
            total += d;
        }
        total
    }

    fn totals(&self) -> Vec<f64> {
        (0..self.len()).map(|member| self.total(member)).collect()
    }

    /// Member with the smallest total; ties go to the lowest slot.
    fn most_crowded(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for member in 0..self.len() {
            let total = self.total(member);
            match best {
                Some((_, b)) if total >= b => {}
                _ => best = Some((member, total)),
            }
        }
        best.map(|(member, _)| member)
    }

    /// Removes `victim` and refreshes the gaps next to its old ranks.
    fn remove(&mut self, victim: usize) {
        let before = self.len();
        let vacated: Vec<usize> = (0..self.num_objectives())
            .map(|obj| self.rank[obj][victim])
            .collect();

        self.values.remove(victim);
        self.distance.remove(victim);

        for (obj, &pos) in vacated.iter().enumerate() {
            self.order[obj].remove(pos);
            for member in self.order[obj].iter_mut() {
                if *member > victim {
                    *member -= 1;
                }
            }
            self.rank[obj].truncate(before - 1);
            self.reindex(obj);

            if pos == 0 || pos + 1 == before {
                // An extreme left: the normalization range changed.
                self.refresh_objective(obj);
            } else {
                self.refresh_rank(obj, pos - 1);
                self.refresh_rank(obj, pos);
            }
        }
    }
}

/// Crowding-distance totals for a set of objective vectors.
///
/// Members at the minimum or maximum of any objective get [`SENTINEL`].
/// With two or fewer members every entry is [`SENTINEL`].
///
/// # Example
///
/// ```
/// use u_moaha::moaha::crowding_distances;
///
/// let d = crowding_distances(&[vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]);
/// assert!(d[0].is_infinite());
/// assert!(d[2].is_infinite());
/// assert!((d[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distances(values: &[Vec<f64>]) -> Vec<f64> {
    CrowdingTable::new(values.to_vec()).totals()
}

/// Removes `excess` members by repeated crowding-distance elimination.
///
/// Returns exactly `agents.len() - excess` members (or none if `excess`
/// covers everything), in their original relative order, each carrying
/// its final crowding distance. Extremes of every objective are kept
/// while any finite-distance member is left to remove.
pub fn decd(agents: Vec<Agent>, excess: usize) -> Vec<Agent> {
    if excess >= agents.len() {
        return Vec::new();
    }

    let mut table = CrowdingTable::new(agents.iter().map(|a| a.values.clone()).collect());
    let mut survivors = agents;

    for _ in 0..excess {
        let Some(victim) = table.most_crowded() else {
            break;
        };
        table.remove(victim);
        survivors.remove(victim);
    }

    for (agent, distance) in survivors.iter_mut().zip(table.totals()) {
        agent.crowding_distance = distance;
    }
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moaha::Evaluation;
    use proptest::prelude::*;

    fn agents_from(values: &[Vec<f64>]) -> Vec<Agent> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Agent::new(i, vec![], Evaluation::new(v.clone())))
            .collect()
    }

    #[test]
    fn test_anti_chain_extremes_are_sentinel() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![2.0, 3.0],
            vec![4.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 1.0],
        ];
        let d = crowding_distances(&objs);
        assert_eq!(d[0], SENTINEL);
        assert_eq!(d[4], SENTINEL);
        for &x in &d[1..4] {
            assert!(x.is_finite() && x > 0.0);
        }
    }

    #[test]
    fn test_small_sets_all_sentinel() {
        assert!(crowding_distances(&[]).is_empty());
        assert_eq!(crowding_distances(&[vec![1.0, 2.0]]), vec![SENTINEL]);
        assert_eq!(
            crowding_distances(&[vec![1.0, 2.0], vec![2.0, 1.0]]),
            vec![SENTINEL, SENTINEL]
        );
    }

    #[test]
    fn test_evenly_spaced_equal_interior() {
        let objs: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64, 4.0 - i as f64]).collect();
        let d = crowding_distances(&objs);
        // Each interior gap is 2/4 per objective.
        for &x in &d[1..4] {
            assert!((x - 1.0).abs() < 1e-12, "got {x}");
        }
    }

    #[test]
    fn test_zero_range_objective_contributes_nothing() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let d = crowding_distances(&objs);
        // Objective 1 ordering is by slot; slot 1 is interior there too.
        assert!((d[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decd_removes_most_crowded() {
        // Slot 2 sits right next to slot 1.
        let objs = vec![
            vec![0.0, 10.0],
            vec![4.0, 6.0],
            vec![4.1, 5.9],
            vec![7.0, 3.0],
            vec![10.0, 0.0],
        ];
        let kept = decd(agents_from(&objs), 1);
        let idx: Vec<usize> = kept.iter().map(|a| a.index).collect();
        assert_eq!(kept.len(), 4);
        assert!(idx.contains(&0) && idx.contains(&4));
        assert!(!idx.contains(&1) || !idx.contains(&2));
    }

    #[test]
    fn test_decd_exact_count_and_order() {
        let objs: Vec<Vec<f64>> = (0..10)
            .map(|i| {
                let x = (i * i) as f64;
                vec![x, 100.0 - x]
            })
            .collect();
        let kept = decd(agents_from(&objs), 6);
        assert_eq!(kept.len(), 4);
        let idx: Vec<usize> = kept.iter().map(|a| a.index).collect();
        let mut sorted = idx.clone();
        sorted.sort_unstable();
        assert_eq!(idx, sorted);
        assert_eq!(idx.first(), Some(&0));
        assert_eq!(idx.last(), Some(&9));
        assert_eq!(kept[0].crowding_distance, SENTINEL);
    }

    #[test]
    fn test_decd_zero_excess_is_identity() {
        let objs = vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![1.5, 1.5]];
        let kept = decd(agents_from(&objs), 0);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_decd_excess_covers_everything() {
        let objs = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert!(decd(agents_from(&objs), 2).is_empty());
        assert!(decd(agents_from(&objs), 5).is_empty());
    }

    #[test]
    fn test_decd_all_sentinel_still_exact() {
        // Three members, two objectives: every member is an extreme somewhere.
        let objs = vec![vec![1.0, 3.0], vec![2.0, 1.0], vec![3.0, 2.0]];
        let kept = decd(agents_from(&objs), 1);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_decd_matches_full_recompute_after_interior_removal() {
        let objs = vec![
            vec![0.0, 9.0],
            vec![1.0, 7.0],
            vec![2.0, 6.5],
            vec![5.0, 3.0],
            vec![9.0, 0.0],
        ];
        let kept = decd(agents_from(&objs), 1);
        let survivors: Vec<Vec<f64>> = kept.iter().map(|a| a.values.clone()).collect();
        let fresh = crowding_distances(&survivors);
        for (a, f) in kept.iter().zip(fresh) {
            assert_eq!(a.crowding_distance, f);
        }
    }

    fn anti_chain(n: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(0.0f64..100.0, n).prop_map(|mut xs| {
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            xs.into_iter().map(|x| vec![x, 100.0 - x]).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_decd_size_and_extremes(
            (objs, excess) in (6usize..24).prop_flat_map(|n| (anti_chain(n), 0..(n - 4)))
        ) {
            let n = objs.len();
            let kept = decd(agents_from(&objs), excess);
            prop_assert_eq!(kept.len(), n - excess);

            for obj in 0..2 {
                let min = objs.iter().map(|v| v[obj]).fold(f64::INFINITY, f64::min);
                let max = objs.iter().map(|v| v[obj]).fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(kept.iter().any(|a| a.values[obj] == min));
                prop_assert!(kept.iter().any(|a| a.values[obj] == max));
            }
        }

        #[test]
        fn prop_decd_random_points_exact_count(
            objs in prop::collection::vec(prop::collection::vec(0.0f64..10.0, 3), 1..20),
            excess in 0usize..25,
        ) {
            let n = objs.len();
            let kept = decd(agents_from(&objs), excess);
            prop_assert_eq!(kept.len(), n.saturating_sub(excess));
        }
    }
}
