//! Monotone threshold access trees.
//!
//! The tree is a pure policy value: leaves carry attribute labels,
//! internal nodes are (k, n)-threshold gates, AND = (n, n), OR = (1, n).
//! Nodes are identified by their depth-first preorder index, which is
//! what the ciphertext uses to key the per-leaf share annotations; the
//! tree itself is never mutated by encryption.

use crate::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyNode {
    Leaf {
        attribute: String,
    },
    Gate {
        threshold: usize,
        children: Vec<PolicyNode>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTree {
    pub root: PolicyNode,
}

impl PolicyNode {
    pub fn leaf(attribute: impl Into<String>) -> Self {
        PolicyNode::Leaf {
            attribute: attribute.into(),
        }
    }

    /// (n, n) gate.
    pub fn and(children: Vec<PolicyNode>) -> Self {
        let threshold = children.len();
        PolicyNode::Gate {
            threshold,
            children,
        }
    }

    /// (1, n) gate.
    pub fn or(children: Vec<PolicyNode>) -> Self {
        PolicyNode::Gate {
            threshold: 1,
            children,
        }
    }

    pub fn threshold(threshold: usize, children: Vec<PolicyNode>) -> Self {
        PolicyNode::Gate {
            threshold,
            children,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            PolicyNode::Leaf { attribute } => {
                if attribute.is_empty() {
                    return Err(Error::InvalidAccessTree);
                }
            }
            PolicyNode::Gate {
                threshold,
                children,
            } => {
                if *threshold == 0 || *threshold > children.len() || children.is_empty() {
                    return Err(Error::InvalidAccessTree);
                }
                for child in children {
                    child.validate()?;
                }
            }
        }
        Ok(())
    }

    pub fn satisfied_by(&self, attributes: &[String]) -> bool {
        match self {
            PolicyNode::Leaf { attribute } => attributes.iter().any(|a| a == attribute),
            PolicyNode::Gate {
                threshold,
                children,
            } => {
                let satisfied = children
                    .iter()
                    .filter(|child| child.satisfied_by(attributes))
                    .count();
                satisfied >= *threshold
            }
        }
    }
}

impl AccessTree {
    pub fn new(root: PolicyNode) -> Self {
        AccessTree { root }
    }

    pub fn validate(&self) -> Result<()> {
        self.root.validate()
    }

    pub fn satisfied_by(&self, attributes: &[String]) -> bool {
        self.root.satisfied_by(attributes)
    }

    /// Leaves keyed by preorder index.
    pub fn leaves(&self) -> BTreeMap<usize, &str> {
        let mut leaves = BTreeMap::new();
        let mut counter = 0usize;
        collect_leaves(&self.root, &mut counter, &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(
    node: &'a PolicyNode,
    counter: &mut usize,
    leaves: &mut BTreeMap<usize, &'a str>,
) {
    let id = *counter;
    *counter += 1;
    match node {
        PolicyNode::Leaf { attribute } => {
            leaves.insert(id, attribute.as_str());
        }
        PolicyNode::Gate { children, .. } => {
            for child in children {
                collect_leaves(child, counter, leaves);
            }
        }
    }
}

/// Splits `secret` down the tree: every gate draws a random degree
/// (threshold - 1) polynomial over Z_q with constant term equal to its
/// incoming share, child i receiving the evaluation at i (1-indexed).
/// Returns the leaf shares keyed by preorder index; no polynomial
/// survives the walk.
pub(crate) fn split_shares<R: Rng>(
    root: &PolicyNode,
    secret: &BigUint,
    q: &BigUint,
    rng: &mut R,
) -> BTreeMap<usize, BigUint> {
    let mut shares = BTreeMap::new();
    let mut counter = 0usize;
    assign_share(root, secret.clone(), q, rng, &mut counter, &mut shares);
    shares
}

fn assign_share<R: Rng>(
    node: &PolicyNode,
    share: BigUint,
    q: &BigUint,
    rng: &mut R,
    counter: &mut usize,
    shares: &mut BTreeMap<usize, BigUint>,
) {
    let id = *counter;
    *counter += 1;
    match node {
        PolicyNode::Leaf { .. } => {
            shares.insert(id, share);
        }
        PolicyNode::Gate {
            threshold,
            children,
        } => {
            let mut coefficients = Vec::with_capacity(*threshold);
            coefficients.push(share);
            for _ in 1..*threshold {
                coefficients.push(rng.gen_biguint_below(q));
            }
            for (index, child) in children.iter().enumerate() {
                let at = BigUint::from(index + 1);
                let value = evaluate_polynomial(&coefficients, &at, q);
                assign_share(child, value, q, rng, counter, shares);
            }
        }
    }
}

fn evaluate_polynomial(coefficients: &[BigUint], at: &BigUint, q: &BigUint) -> BigUint {
    let mut value = BigUint::zero();
    for coefficient in coefficients.iter().rev() {
        value = (value * at + coefficient) % q;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn leaves_and_gates_satisfy_as_expected() {
        let tree = AccessTree::new(PolicyNode::and(vec![
            PolicyNode::leaf("attr1"),
            PolicyNode::leaf("attr2"),
        ]));
        assert!(tree.satisfied_by(&attrs(&["attr1", "attr2"])));
        assert!(tree.satisfied_by(&attrs(&["attr2", "attr1", "extra"])));
        assert!(!tree.satisfied_by(&attrs(&["attr1"])));
        assert!(!tree.satisfied_by(&attrs(&[])));

        let either = AccessTree::new(PolicyNode::or(vec![
            PolicyNode::leaf("a"),
            PolicyNode::leaf("b"),
        ]));
        assert!(either.satisfied_by(&attrs(&["b"])));
        assert!(!either.satisfied_by(&attrs(&["c"])));
    }

    #[test]
    fn threshold_gates_count_children() {
        let tree = AccessTree::new(PolicyNode::threshold(
            2,
            vec![
                PolicyNode::leaf("a"),
                PolicyNode::leaf("b"),
                PolicyNode::leaf("c"),
            ],
        ));
        assert!(tree.satisfied_by(&attrs(&["a", "c"])));
        assert!(tree.satisfied_by(&attrs(&["b", "c"])));
        assert!(!tree.satisfied_by(&attrs(&["a"])));
    }

    #[test]
    fn nested_policies_recurse() {
        let tree = AccessTree::new(PolicyNode::and(vec![
            PolicyNode::leaf("admin"),
            PolicyNode::or(vec![PolicyNode::leaf("dev"), PolicyNode::leaf("ops")]),
        ]));
        assert!(tree.satisfied_by(&attrs(&["admin", "ops"])));
        assert!(tree.satisfied_by(&attrs(&["admin", "dev"])));
        assert!(!tree.satisfied_by(&attrs(&["admin"])));
        assert!(!tree.satisfied_by(&attrs(&["dev", "ops"])));
    }

    #[test]
    fn validation_rejects_broken_invariants() {
        assert!(PolicyNode::leaf("x").validate().is_ok());
        assert_eq!(
            PolicyNode::leaf("").validate(),
            Err(Error::InvalidAccessTree)
        );
        assert_eq!(
            PolicyNode::threshold(3, vec![PolicyNode::leaf("a"), PolicyNode::leaf("b")])
                .validate(),
            Err(Error::InvalidAccessTree)
        );
        assert_eq!(
            PolicyNode::threshold(0, vec![PolicyNode::leaf("a")]).validate(),
            Err(Error::InvalidAccessTree)
        );
        assert_eq!(
            PolicyNode::and(vec![]).validate(),
            Err(Error::InvalidAccessTree)
        );
    }

    #[test]
    fn preorder_ids_are_stable() {
        let tree = AccessTree::new(PolicyNode::and(vec![
            PolicyNode::leaf("a"),
            PolicyNode::or(vec![PolicyNode::leaf("b"), PolicyNode::leaf("c")]),
            PolicyNode::leaf("d"),
        ]));
        let leaves = tree.leaves();
        let collected: Vec<(usize, &str)> = leaves.iter().map(|(&id, &a)| (id, a)).collect();
        assert_eq!(collected, vec![(1, "a"), (3, "b"), (4, "c"), (5, "d")]);
    }

    #[test]
    fn shares_reconstruct_through_any_quorum() {
        let q = BigUint::from(1009u32);
        let secret = BigUint::from(123u32);
        let mut rng = XorShiftRng::seed_from_u64(5);
        let tree = AccessTree::new(PolicyNode::threshold(
            2,
            vec![
                PolicyNode::leaf("a"),
                PolicyNode::leaf("b"),
                PolicyNode::leaf("c"),
            ],
        ));
        let shares = split_shares(&tree.root, &secret, &q, &mut rng);
        assert_eq!(shares.len(), 3);

        // leaf ids 1..=3 correspond to evaluation points 1..=3
        let reconstruct = |points: &[usize]| -> BigUint {
            let mut acc = BigUint::zero();
            for &i in points {
                let mut num = BigUint::from(1u32);
                let mut den = BigUint::from(1u32);
                for &j in points {
                    if i == j {
                        continue;
                    }
                    num = (num * (&q - BigUint::from(j as u32))) % &q;
                    let diff = ((&q + BigUint::from(i as u32)) - BigUint::from(j as u32)) % &q;
                    den = (den * diff) % &q;
                }
                let coeff =
                    (num * algebra::fields::fp::inverse(&den, &q).unwrap()) % &q;
                acc = (acc + &shares[&i] * coeff) % &q;
            }
            acc
        };
        assert_eq!(reconstruct(&[1, 2]), secret);
        assert_eq!(reconstruct(&[1, 3]), secret);
        assert_eq!(reconstruct(&[2, 3]), secret);
        assert_eq!(reconstruct(&[1, 2, 3]), secret);
        assert_ne!(reconstruct(&[1]), secret);
    }
}
