//! Bounded Hierarchy Digging
//!
//! Walks a type's superclass chain from a starting type up to an inclusive
//! bound, handing each visited type to a caller-supplied probe. The probe
//! decides what counts as a match; the digger only decides where to look.
//!
//! ## Walk order
//!
//! | Variant               | Per level                                        |
//! |-----------------------|--------------------------------------------------|
//! | `dig`                 | the class itself                                 |
//! | `dig_with_interfaces` | the class, then its interfaces breadth first     |
//!
//! The ascent stops at the first match, after probing `bound`, or at the root
//! (a type without a superclass), whichever comes first. A `bound` that is not
//! an ancestor of `start` therefore searches the whole chain up to the root.
//! A superclass chain that loops back on itself ends the walk where it would
//! revisit a type, so every type is probed at most once per dig.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::error::DigError;

/// Read-only view of a type hierarchy
///
/// Superclass chains are expected to end at a root. A chain that cycles does
/// not hang a dig: the walk stops before revisiting a type and reports a miss.
pub trait TypeHierarchy {
    /// Handle identifying one type
    type Type: Copy + Eq + Hash + Debug;

    /// Whether the handle belongs to this hierarchy
    fn contains(&self, ty: Self::Type) -> bool;

    /// Direct superclass, `None` for roots
    fn superclass(&self, ty: Self::Type) -> Option<Self::Type>;

    /// Directly implemented interfaces, in declaration order
    fn interfaces(&self, ty: Self::Type) -> &[Self::Type];
}

impl<H: TypeHierarchy + ?Sized> TypeHierarchy for &H {
    type Type = H::Type;

    fn contains(&self, ty: Self::Type) -> bool {
        (**self).contains(ty)
    }

    fn superclass(&self, ty: Self::Type) -> Option<Self::Type> {
        (**self).superclass(ty)
    }

    fn interfaces(&self, ty: Self::Type) -> &[Self::Type] {
        (**self).interfaces(ty)
    }
}

/// A member found by a dig, paired with the type that declared it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoundMember<T, M> {
    owner: T,
    member: M,
}

impl<T: Copy, M> FoundMember<T, M> {
    /// Pair a member with its owner
    pub fn new(owner: T, member: M) -> Self {
        Self { owner, member }
    }

    /// Type on which the probe matched
    pub fn owner(&self) -> T {
        self.owner
    }

    /// The matched member
    pub fn member(&self) -> &M {
        &self.member
    }

    /// Drop the owner and keep the member
    pub fn into_member(self) -> M {
        self.member
    }

    /// Split into `(owner, member)`
    pub fn into_parts(self) -> (T, M) {
        (self.owner, self.member)
    }

    /// Transform the member, keeping the owner
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> FoundMember<T, N> {
        FoundMember {
            owner: self.owner,
            member: f(self.member),
        }
    }
}

/// Result of a dig: a match, nothing, or the probe's own error
pub type DigResult<T, M, E> = Result<Option<FoundMember<T, M>>, E>;

/// Stateless walker over a borrowed hierarchy
pub struct HierarchyDigger<'h, H: ?Sized> {
    hierarchy: &'h H,
}

impl<H: ?Sized> Clone for HierarchyDigger<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for HierarchyDigger<'_, H> {}

impl<'h, H: TypeHierarchy + ?Sized> HierarchyDigger<'h, H> {
    /// Create a digger over the given hierarchy
    pub fn new(hierarchy: &'h H) -> Self {
        Self { hierarchy }
    }

    /// Probe `start` and its superclasses up to `bound` (inclusive)
    ///
    /// Returns the first match together with its owner, `None` once `bound`
    /// or the root has been probed without a match, or the first error the
    /// probe raises.
    pub fn dig<M, E, F>(&self, start: H::Type, probe: F, bound: H::Type) -> DigResult<H::Type, M, E>
    where
        F: FnMut(H::Type) -> Result<Option<M>, E>,
        E: From<DigError>,
    {
        self.ascend(start, probe, bound, false)
    }

    /// Like [`dig`](Self::dig), but each level also probes every interface
    /// reachable from the class after the class itself
    pub fn dig_with_interfaces<M, E, F>(
        &self,
        start: H::Type,
        probe: F,
        bound: H::Type,
    ) -> DigResult<H::Type, M, E>
    where
        F: FnMut(H::Type) -> Result<Option<M>, E>,
        E: From<DigError>,
    {
        self.ascend(start, probe, bound, true)
    }

    fn ascend<M, E, F>(
        &self,
        start: H::Type,
        mut probe: F,
        bound: H::Type,
        with_interfaces: bool,
    ) -> DigResult<H::Type, M, E>
    where
        F: FnMut(H::Type) -> Result<Option<M>, E>,
        E: From<DigError>,
    {
        self.ensure_known(start)?;
        self.ensure_known(bound)?;

        let mut seen_classes = FxHashSet::default();
        let mut seen_interfaces = FxHashSet::default();
        let mut current = start;

        loop {
            seen_classes.insert(current);
            trace!(ty = ?current, "probing class");
            if let Some(member) = probe(current)? {
                debug!(owner = ?current, ?start, "dig matched");
                return Ok(Some(FoundMember::new(current, member)));
            }

            if with_interfaces {
                let found = self.probe_interfaces(current, &mut probe, &mut seen_interfaces)?;
                if found.is_some() {
                    return Ok(found);
                }
            }

            if current == bound {
                debug!(?start, ?bound, "dig exhausted at bound");
                return Ok(None);
            }

            match self.hierarchy.superclass(current) {
                Some(parent) if seen_classes.contains(&parent) => {
                    warn!(?start, ty = ?current, ?parent, "superclass chain loops, dig stopped");
                    return Ok(None);
                }
                Some(parent) => current = parent,
                None => {
                    debug!(?start, ?bound, root = ?current, "dig exhausted at root, bound not reached");
                    return Ok(None);
                }
            }
        }
    }

    /// Breadth-first pass over the interfaces reachable from `class`,
    /// skipping any interface already probed during this search
    fn probe_interfaces<M, E, F>(
        &self,
        class: H::Type,
        probe: &mut F,
        seen: &mut FxHashSet<H::Type>,
    ) -> DigResult<H::Type, M, E>
    where
        F: FnMut(H::Type) -> Result<Option<M>, E>,
    {
        let mut queue: VecDeque<H::Type> = self.hierarchy.interfaces(class).iter().copied().collect();

        while let Some(interface) = queue.pop_front() {
            if !seen.insert(interface) {
                continue;
            }

            trace!(ty = ?interface, implementor = ?class, "probing interface");
            if let Some(member) = probe(interface)? {
                debug!(owner = ?interface, implementor = ?class, "dig matched on interface");
                return Ok(Some(FoundMember::new(interface, member)));
            }

            queue.extend(self.hierarchy.interfaces(interface).iter().copied());
        }

        Ok(None)
    }

    fn ensure_known(&self, ty: H::Type) -> Result<(), DigError> {
        if self.hierarchy.contains(ty) {
            Ok(())
        } else {
            Err(DigError::UnknownType {
                ty: format!("{:?}", ty),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Index-based hierarchy: `parents[i]` is the superclass of `i`
    struct Tree {
        parents: Vec<Option<usize>>,
        interfaces: Vec<Vec<usize>>,
    }

    impl Tree {
        fn new(parents: Vec<Option<usize>>) -> Self {
            let interfaces = vec![Vec::new(); parents.len()];
            Self { parents, interfaces }
        }

        fn implement(mut self, ty: usize, interfaces: &[usize]) -> Self {
            self.interfaces[ty] = interfaces.to_vec();
            self
        }
    }

    impl TypeHierarchy for Tree {
        type Type = usize;

        fn contains(&self, ty: usize) -> bool {
            ty < self.parents.len()
        }

        fn superclass(&self, ty: usize) -> Option<usize> {
            self.parents[ty]
        }

        fn interfaces(&self, ty: usize) -> &[usize] {
            &self.interfaces[ty]
        }
    }

    #[derive(Debug, PartialEq)]
    enum ProbeError {
        Inaccessible(usize),
        Dig(DigError),
    }

    impl From<DigError> for ProbeError {
        fn from(err: DigError) -> Self {
            ProbeError::Dig(err)
        }
    }

    /// 0 <- 1 <- 2 <- 3, plus 4 as an unrelated root
    fn chain() -> Tree {
        Tree::new(vec![None, Some(0), Some(1), Some(2), None])
    }

    #[test]
    fn test_dig_unrelated_bound_stops_at_root() {
        let tree = chain();
        let mut visited = Vec::new();

        let found = HierarchyDigger::new(&tree)
            .dig(
                3,
                |ty| {
                    visited.push(ty);
                    Ok::<Option<()>, ProbeError>(None)
                },
                4,
            )
            .unwrap();

        assert!(found.is_none());
        // depth(3 -> root) + 1
        assert_eq!(visited, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_dig_short_circuits_on_nearest_match() {
        let tree = chain();
        let mut visited = Vec::new();

        let found = HierarchyDigger::new(&tree)
            .dig(
                3,
                |ty| {
                    visited.push(ty);
                    Ok::<_, ProbeError>((ty <= 2).then_some(ty * 10))
                },
                0,
            )
            .unwrap()
            .unwrap();

        assert_eq!(found.owner(), 2);
        assert_eq!(*found.member(), 20);
        assert_eq!(visited, vec![3, 2]);
    }

    #[test]
    fn test_dig_bound_is_inclusive() {
        let tree = chain();

        let found = HierarchyDigger::new(&tree)
            .dig(2, |ty| Ok::<_, ProbeError>((ty == 1).then_some("bound")), 1)
            .unwrap();

        assert_eq!(found, Some(FoundMember::new(1, "bound")));
    }

    #[test]
    fn test_dig_exhausts_path_in_order() {
        let tree = chain();
        let mut visited = Vec::new();

        let found = HierarchyDigger::new(&tree)
            .dig(
                3,
                |ty| {
                    visited.push(ty);
                    Ok::<Option<()>, ProbeError>(None)
                },
                1,
            )
            .unwrap();

        assert!(found.is_none());
        assert_eq!(visited, vec![3, 2, 1]);
    }

    #[test]
    fn test_dig_start_equal_to_bound_probes_once() {
        let tree = chain();
        let mut calls = 0;

        let found = HierarchyDigger::new(&tree)
            .dig(
                2,
                |_| {
                    calls += 1;
                    Ok::<Option<()>, ProbeError>(None)
                },
                2,
            )
            .unwrap();

        assert!(found.is_none());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_dig_propagates_probe_failure() {
        let tree = chain();
        let mut visited = Vec::new();

        let result = HierarchyDigger::new(&tree).dig(
            3,
            |ty| {
                visited.push(ty);
                if ty == 2 {
                    Err(ProbeError::Inaccessible(ty))
                } else {
                    Ok::<Option<()>, _>(None)
                }
            },
            0,
        );

        assert_eq!(result, Err(ProbeError::Inaccessible(2)));
        assert_eq!(visited, vec![3, 2]);
    }

    #[test]
    fn test_dig_rejects_unknown_types_before_probing() {
        let tree = chain();
        let mut calls = 0;

        let result = HierarchyDigger::new(&tree).dig(
            99,
            |_| {
                calls += 1;
                Ok::<Option<()>, ProbeError>(None)
            },
            0,
        );
        assert_eq!(
            result,
            Err(ProbeError::Dig(DigError::UnknownType { ty: "99".to_string() }))
        );

        let result = HierarchyDigger::new(&tree).dig(
            3,
            |_| {
                calls += 1;
                Ok::<Option<()>, ProbeError>(None)
            },
            42,
        );
        assert!(matches!(result, Err(ProbeError::Dig(_))));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_interface_match_only_seen_with_interfaces() {
        // 1 implements interface 2
        let tree = Tree::new(vec![None, Some(0), None]).implement(1, &[2]);
        let probe = |ty: usize| Ok::<_, ProbeError>((ty == 2).then_some("run"));

        let digger = HierarchyDigger::new(&tree);
        assert_eq!(
            digger.dig_with_interfaces(1, probe, 1).unwrap(),
            Some(FoundMember::new(2, "run"))
        );
        assert_eq!(digger.dig(1, probe, 1).unwrap(), None);
    }

    #[test]
    fn test_class_members_win_over_interfaces() {
        let tree = Tree::new(vec![None, Some(0), None]).implement(1, &[2]);
        let mut visited = Vec::new();

        let found = HierarchyDigger::new(&tree)
            .dig_with_interfaces(
                1,
                |ty| {
                    visited.push(ty);
                    Ok::<_, ProbeError>(Some(ty))
                },
                1,
            )
            .unwrap()
            .unwrap();

        assert_eq!(found.owner(), 1);
        assert_eq!(visited, vec![1]);
    }

    #[test]
    fn test_interfaces_probed_before_superclass() {
        // 0 <- 1 <- 2; 2 implements 3, 1 implements 4
        let tree = Tree::new(vec![None, Some(0), Some(1), None, None])
            .implement(2, &[3])
            .implement(1, &[4]);
        let mut visited = Vec::new();

        let found = HierarchyDigger::new(&tree)
            .dig_with_interfaces(
                2,
                |ty| {
                    visited.push(ty);
                    Ok::<Option<()>, ProbeError>(None)
                },
                0,
            )
            .unwrap();

        assert!(found.is_none());
        assert_eq!(visited, vec![2, 3, 1, 4, 0]);
    }

    #[test]
    fn test_transitive_interfaces_are_probed() {
        // 1 implements 2, 2 extends 3
        let tree = Tree::new(vec![None, Some(0), None, None])
            .implement(1, &[2])
            .implement(2, &[3]);

        let found = HierarchyDigger::new(&tree)
            .dig_with_interfaces(1, |ty| Ok::<_, ProbeError>((ty == 3).then_some(())), 1)
            .unwrap();

        assert_eq!(found.map(|f| f.owner()), Some(3));
    }

    #[test]
    fn test_diamond_interface_probed_once() {
        // 0 <- 1 <- 2; 2 implements 3 and 4, both extend 5; 1 implements 5 again
        let tree = Tree::new(vec![None, Some(0), Some(1), None, None, None])
            .implement(2, &[3, 4])
            .implement(3, &[5])
            .implement(4, &[5])
            .implement(1, &[5]);
        let mut visited = Vec::new();

        HierarchyDigger::new(&tree)
            .dig_with_interfaces(
                2,
                |ty| {
                    visited.push(ty);
                    Ok::<Option<()>, ProbeError>(None)
                },
                0,
            )
            .unwrap();

        assert_eq!(visited, vec![2, 3, 4, 5, 1, 0]);
    }

    #[test]
    fn test_cyclic_superclass_chain_terminates() {
        // 0 -> 1 -> 2 -> 0, plus 3 as an unrelated root
        let tree = Tree::new(vec![Some(1), Some(2), Some(0), None]);
        let digger = HierarchyDigger::new(&tree);
        let mut visited = Vec::new();

        let found = digger
            .dig(
                0,
                |ty| {
                    visited.push(ty);
                    Ok::<Option<()>, ProbeError>(None)
                },
                3,
            )
            .unwrap();
        assert!(found.is_none());
        assert_eq!(visited, vec![0, 1, 2]);

        let found = digger
            .dig_with_interfaces(1, |ty| Ok::<_, ProbeError>((ty == 0).then_some("zero")), 3)
            .unwrap();
        assert_eq!(found, Some(FoundMember::new(0, "zero")));
    }

    #[test]
    fn test_found_member_accessors() {
        let found = FoundMember::new(7usize, String::from("value"));
        assert_eq!(found.owner(), 7);
        assert_eq!(found.member(), "value");

        let mapped = found.clone().map(|m| m.len());
        assert_eq!(mapped.into_parts(), (7, 5));
        assert_eq!(found.into_member(), "value");
    }
}
