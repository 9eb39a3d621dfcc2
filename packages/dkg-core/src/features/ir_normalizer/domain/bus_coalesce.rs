//! Bus/bit-edge coalescing: groups per-bit driver->load edges that share
//! `(src, dst, relation, flow, base_signal)` and collapses maximal
//! strictly-descending-consecutive runs of bit indices (length >= 2) into a
//! single bus edge. Singletons and bit-index-free edges pass through
//! unchanged.

use crate::features::identity::ids::{make_edge_id, SignatureBuilder};
use crate::shared::models::{merge_provenances, Edge};
use serde_json::json;
use std::collections::BTreeMap;

/// Groups edges by a key that identifies "the same bus", preserving
/// first-seen group order so output is deterministic across runs with the
/// same input order.
fn group_key(e: &Edge) -> (String, String, u8, u8, String) {
    (
        e.src.clone(),
        e.dst.clone(),
        e.relation_type as u8,
        e.flow_type as u8,
        e.base_signal.clone(),
    )
}

pub fn merge_bit_edges_to_bus(edges: Vec<Edge>) -> Vec<Edge> {
    let mut groups: Vec<Vec<Edge>> = Vec::new();
    let mut index: BTreeMap<(String, String, u8, u8, String), usize> = BTreeMap::new();

    for edge in edges {
        let key = group_key(&edge);
        match index.get(&key) {
            Some(&i) => groups[i].push(edge),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![edge]);
            }
        }
    }

    let mut out = Vec::new();
    for mut members in groups {
        // Descending by bit index: flush_bucketed_runs walks msb-to-lsb.
        members.sort_by_key(|e| match e.bit_index {
            Some(b) => (0u8, std::cmp::Reverse(b)),
            None => (1u8, std::cmp::Reverse(0)),
        });
        out.extend(flush_bucketed_runs(members));
    }
    out
}

fn flush_bucketed_runs(members: Vec<Edge>) -> Vec<Edge> {
    let mut out = Vec::new();
    let mut bucket: Vec<Edge> = Vec::new();

    let flush = |bucket: &mut Vec<Edge>, out: &mut Vec<Edge>| {
        if bucket.is_empty() {
            return;
        }
        if bucket.len() == 1 {
            out.push(bucket.pop().unwrap());
            return;
        }
        let msb = bucket.first().unwrap().bit_index.unwrap();
        let lsb = bucket.last().unwrap().bit_index.unwrap();
        let merged_bits: Vec<u32> = bucket.iter().filter_map(|e| e.bit_index).collect();
        let mut sorted_bits = merged_bits.clone();
        sorted_bits.sort_unstable();

        let first = &bucket[0];
        let signature = SignatureBuilder::new()
            .field(&first.src)
            .field(&first.dst)
            .field(first.relation_type.as_str())
            .field(&first.base_signal)
            .field(format!("{msb}:{lsb}"))
            .signature();
        let mut merged = Edge::new(
            make_edge_id(first.relation_type.as_str(), &signature),
            first.src.clone(),
            first.dst.clone(),
            first.relation_type,
            first.flow_type,
            first.base_signal.clone(),
            None,
        );
        merged.bit_range = Some((msb, lsb));
        merged.attributes.insert("merged_bits".to_string(), json!(sorted_bits));
        merged.provenance = merge_provenances(bucket.drain(..).map(|e| e.provenance));
        out.push(merged);
    };

    for edge in members {
        match edge.bit_index {
            None => {
                flush(&mut bucket, &mut out);
                out.push(edge);
            }
            Some(bit) => {
                let continues_run = bucket
                    .last()
                    .and_then(|prev| prev.bit_index)
                    .map(|prev_bit| bit + 1 == prev_bit)
                    .unwrap_or(false);
                if bucket.is_empty() || continues_run {
                    bucket.push(edge);
                } else {
                    flush(&mut bucket, &mut out);
                    bucket.push(edge);
                }
            }
        }
    }
    flush(&mut bucket, &mut out);
    out
}
