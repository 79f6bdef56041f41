//! Splits validated records across agents in contiguous, near-equal blocks.

use crate::error::{ApiError, ApiResult};
use crate::services::lists::batch_id::BatchIdGenerator;
use crate::store::now_timestamp;
use common::model::contact::ContactRecord;
use common::model::item::{AssignedItem, ItemStatus};
use uuid::Uuid;

pub const NO_AGENTS: &str = "No agents found. Please create agents first.";

#[derive(Debug, Clone)]
pub struct Distribution {
    pub batch_id: String,
    pub assignments: Vec<AssignedItem>,
    pub total_records: usize,
    pub distributed_records: usize,
    pub created_at: String,
}

/// Records per agent: `n / k` each, plus one for the first `n % k` agents.
pub fn allotments(records: usize, agents: usize) -> Vec<usize> {
    if agents == 0 {
        return Vec::new();
    }
    let base = records / agents;
    let extra = records % agents;
    (0..agents).map(|i| base + usize::from(i < extra)).collect()
}

/// Assigns `records` to `agent_ids` under a fresh batch id.
///
/// Agent `i` receives the next `allotments[i]` records in input order. Agents
/// whose allotment is zero get no items. Fails without generating anything
/// when there are no agents.
pub fn distribute(
    records: Vec<ContactRecord>,
    agent_ids: &[String],
    batch_ids: &BatchIdGenerator,
) -> ApiResult<Distribution> {
    if agent_ids.is_empty() {
        return Err(ApiError::precondition(NO_AGENTS));
    }

    let total_records = records.len();
    let batch_id = batch_ids.next_id();
    let created_at = now_timestamp();

    let mut remaining = records.into_iter();
    let mut assignments = Vec::with_capacity(total_records);
    for (agent_id, count) in agent_ids.iter().zip(allotments(total_records, agent_ids.len())) {
        for contact in remaining.by_ref().take(count) {
            assignments.push(AssignedItem {
                id: Uuid::new_v4().to_string(),
                contact,
                agent_id: agent_id.clone(),
                batch_id: batch_id.clone(),
                status: ItemStatus::Pending,
                created_at: created_at.clone(),
            });
        }
    }

    Ok(Distribution {
        distributed_records: assignments.len(),
        batch_id,
        assignments,
        total_records,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn records(n: usize) -> Vec<ContactRecord> {
        (0..n)
            .map(|i| ContactRecord::new(&format!("Contact {}", i), "555 0100", None).unwrap())
            .collect()
    }

    fn agents(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("agent-{}", i)).collect()
    }

    fn counts(dist: &Distribution, agent_ids: &[String]) -> Vec<usize> {
        let mut by_agent: HashMap<&str, usize> = HashMap::new();
        for item in &dist.assignments {
            *by_agent.entry(item.agent_id.as_str()).or_default() += 1;
        }
        agent_ids
            .iter()
            .map(|a| by_agent.get(a.as_str()).copied().unwrap_or(0))
            .collect()
    }

    #[test]
    fn ten_records_three_agents() {
        let agent_ids = agents(3);
        let dist = distribute(records(10), &agent_ids, &BatchIdGenerator::new()).unwrap();

        assert_eq!(counts(&dist, &agent_ids), vec![4, 3, 3]);
        assert_eq!(dist.total_records, 10);
        assert_eq!(dist.distributed_records, 10);
        assert!(dist.batch_id.starts_with("BATCH-"));
        assert!(dist.assignments.iter().all(|i| i.batch_id == dist.batch_id));
        assert!(dist.assignments.iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn blocks_are_contiguous_in_input_order() {
        let agent_ids = agents(3);
        let dist = distribute(records(7), &agent_ids, &BatchIdGenerator::new()).unwrap();

        let layout: Vec<(String, String)> = dist
            .assignments
            .iter()
            .map(|i| (i.agent_id.clone(), i.contact.first_name().to_string()))
            .collect();
        let expected: Vec<(String, String)> = [0, 0, 0, 1, 1, 2, 2]
            .iter()
            .enumerate()
            .map(|(rec, agent)| (format!("agent-{}", agent), format!("Contact {}", rec)))
            .collect();
        assert_eq!(layout, expected);
    }

    #[test]
    fn fewer_records_than_agents() {
        let agent_ids = agents(5);
        let dist = distribute(records(2), &agent_ids, &BatchIdGenerator::new()).unwrap();

        assert_eq!(dist.assignments.len(), 2);
        assert_eq!(counts(&dist, &agent_ids), vec![1, 1, 0, 0, 0]);
        assert!(dist
            .assignments
            .iter()
            .all(|i| i.agent_id == "agent-0" || i.agent_id == "agent-1"));
    }

    #[test]
    fn no_agents_is_a_precondition_failure() {
        let err = distribute(records(3), &[], &BatchIdGenerator::new()).unwrap_err();
        match err {
            ApiError::Precondition { message, rejections } => {
                assert_eq!(message, NO_AGENTS);
                assert!(rejections.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn every_call_gets_a_new_batch() {
        let ids = BatchIdGenerator::new();
        let a = distribute(records(1), &agents(1), &ids).unwrap();
        let b = distribute(records(1), &agents(1), &ids).unwrap();
        assert_ne!(a.batch_id, b.batch_id);
    }

    #[test]
    fn counts_are_balanced_for_all_small_inputs() {
        let ids = BatchIdGenerator::new();
        for k in 1..=7 {
            let agent_ids = agents(k);
            for n in 0..=40 {
                let dist = distribute(records(n), &agent_ids, &ids).unwrap();
                let per_agent = counts(&dist, &agent_ids);

                assert_eq!(dist.assignments.len(), n);
                assert_eq!(per_agent.iter().sum::<usize>(), n);

                let max = *per_agent.iter().max().unwrap();
                let min = *per_agent.iter().min().unwrap();
                assert!(max - min <= 1, "n={} k={} counts={:?}", n, k, per_agent);

                let larger = n % k;
                for (i, count) in per_agent.iter().enumerate() {
                    let expected = n / k + usize::from(i < larger);
                    assert_eq!(*count, expected, "n={} k={} agent={}", n, k, i);
                }
            }
        }
    }

    #[test]
    fn allotments_without_agents_is_empty() {
        assert!(allotments(10, 0).is_empty());
        assert_eq!(allotments(0, 3), vec![0, 0, 0]);
    }
}
