//! Instruction resolution: find the concrete definition of an instruction for a given lhs.
//!
//! The search is a loop over the lhs's type chain, never recursion. For the current object:
//!
//! 1. probe `vid::inst` when it has a value id;
//! 2. probe `tid::inst` (the bare inst id when `tid` is `/mmadt/obj`);
//! 3. read `tid` and continue from that definition, stopping when no new type appears.
//!
//! If that pass fails, one more pass starts from the range declared by the lhs's type. Every
//! probe is recorded in the [`Derivation`] whether it hits or not.

use std::collections::BTreeSet;

use log::debug;

use fhatos_furi::Furi;

use crate::derivation::Derivation;
use crate::obj::{Obj, OBJ_FURI};
use crate::{Error, Oracle};

/// The outcome of a resolution walk.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// The instruction was the noobj sentinel and is returned as is.
    Noop,
    /// An invokable definition was found in the graph.
    Found(Obj),
    /// Nothing was found but the reference itself carries a body.
    Literal(Obj),
    /// Every probe missed.
    Unresolved,
}

pub struct Resolver<'a, O: Oracle + ?Sized> {
    oracle: &'a O,
    log: &'a mut Derivation,
}

impl<'a, O: Oracle + ?Sized> Resolver<'a, O> {
    pub fn new(oracle: &'a O, log: &'a mut Derivation) -> Self {
        Resolver { oracle, log }
    }

    pub fn resolve(&mut self, lhs: &Obj, inst: &Obj) -> Result<Resolution, Error> {
        if inst.is_noobj() {
            return Ok(Resolution::Noop);
        }
        let inst_type_id = self.oracle.resolve_namespace(&inst.tid.no_query());
        debug!("resolving {} for {}", inst_type_id, lhs.vid_or_tid());

        self.log.mark_pass(lhs.vid_or_tid());
        if let Some(found) = self.pass(lhs.vid.as_ref(), &lhs.tid, &inst_type_id) {
            debug!("resolved {} to {}", inst_type_id, found.vid_or_tid());
            return Ok(Resolution::Found(found));
        }

        let range = self.oracle.read(&lhs.tid.no_query()).range()?.no_query();
        let root = self.oracle.read(&range);
        self.log.mark_pass(&range);
        let found = if root.is_noobj() {
            self.pass(None, &range, &inst_type_id)
        } else {
            let vid = root.vid.as_ref().unwrap_or(&range);
            self.pass(Some(vid), &root.tid, &inst_type_id)
        };
        if let Some(found) = found {
            debug!(
                "resolved {} to {} through range {}",
                inst_type_id,
                found.vid_or_tid(),
                range
            );
            return Ok(Resolution::Found(found));
        }

        if inst.is_invokable() {
            debug!("{} resolved to itself", inst_type_id);
            return Ok(Resolution::Literal(inst.clone()));
        }
        debug!("{} unresolved for {}", inst_type_id, lhs.vid_or_tid());
        Ok(Resolution::Unresolved)
    }

    fn pass(&mut self, vid: Option<&Furi>, tid: &Furi, inst_type_id: &Furi) -> Option<Obj> {
        let mut vid = vid.map(Furi::no_query);
        let mut tid = tid.no_query();
        let mut seen = BTreeSet::from([tid.clone()]);
        loop {
            if let Some(vid) = &vid {
                if let Some(hit) = self.probe(vid, &vid.add_component(inst_type_id)) {
                    return Some(hit);
                }
            }
            let probe = if tid == *OBJ_FURI {
                inst_type_id.clone()
            } else {
                tid.add_component(inst_type_id)
            };
            if let Some(hit) = self.probe(&tid, &probe) {
                return Some(hit);
            }
            let definition = self.oracle.read(&tid);
            let super_type = definition.tid.no_query();
            if definition.is_noobj() || !seen.insert(super_type.clone()) {
                debug!("no super type above {}", tid);
                return None;
            }
            vid = definition.vid.as_ref().map(Furi::no_query);
            tid = super_type;
        }
    }

    fn probe(&mut self, source: &Furi, probe: &Furi) -> Option<Obj> {
        let found = self.oracle.read(probe);
        debug!("probe {} => {}", probe, found);
        self.log.record(source, probe, &found);
        found.is_invokable().then_some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{Args, Inst, InstF, OType};
    use fhatos_furi::furi;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Graph(BTreeMap<Furi, Obj>);

    impl Graph {
        fn with(mut self, id: &str, obj: Obj) -> Self {
            self.0.insert(furi!(id), obj);
            self
        }
    }

    impl Oracle for Graph {
        fn read(&self, id: &Furi) -> Obj {
            self.0.get(id).cloned().unwrap_or_else(Obj::noobj)
        }

        fn resolve_namespace(&self, furi: &Furi) -> Furi {
            furi.clone()
        }
    }

    fn body() -> Inst {
        Inst::new("plus", Args::new()).with_f(InstF::new(|lhs, _| Ok(lhs.clone())))
    }

    fn reference(op: &str) -> Obj {
        Obj::inst(furi!(op), Inst::new(op, Args::new()))
    }

    #[test]
    fn noobj_is_a_noop() {
        let graph = Graph::default();
        let mut log = Derivation::new();
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&Obj::int(1), &Obj::noobj())
            .unwrap();
        assert_eq!(resolution, Resolution::Noop);
        assert!(log.is_empty());
    }

    #[test]
    fn flat_probe_at_the_root_type() {
        let graph = Graph::default().with("plus", Obj::inst(furi!("plus"), body()));
        let mut log = Derivation::new();
        let lhs = Obj::str("a").with_tid(OBJ_FURI.clone());
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        assert!(matches!(resolution, Resolution::Found(_)));
        let probes: Vec<String> = log.probes().map(|s| s.probe.to_string()).collect();
        assert_eq!(probes, vec!["plus"]);
    }

    #[test]
    fn ascends_through_super_types() {
        let graph = Graph::default()
            .with("/nat", Obj::type_of(OType::Int).with_tid(furi!("/int")))
            .with("/int", Obj::type_of(OType::Int).with_tid(furi!("/int")))
            .with("/int::plus", Obj::inst(furi!("/int::plus"), body()));
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/nat"));
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        match resolution {
            Resolution::Found(found) => assert_eq!(found.tid, furi!("/int::plus")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(log.probes().count(), 2);
    }

    #[test]
    fn stubs_do_not_count_as_hits() {
        let graph = Graph::default().with(
            "/int::plus",
            Obj::inst(furi!("/int::plus"), Inst::new("plus", Args::new())),
        );
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/int"));
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[test]
    fn range_pass_after_the_own_type_pass() {
        let graph = Graph::default()
            .with("/nat", Obj::type_of(OType::Int).with_tid(furi!("/nat?rng=/num")))
            .with("/num::plus", Obj::inst(furi!("/num::plus"), body()));
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/nat"));
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        match resolution {
            Resolution::Found(found) => assert_eq!(found.tid, furi!("/num::plus")),
            other => panic!("unexpected {:?}", other),
        }
        let markers = log.steps().iter().filter(|s| s.is_marker()).count();
        assert_eq!(markers, 2);
        let probes: Vec<Furi> = log.probes().map(|s| s.probe.clone()).collect();
        assert_eq!(
            probes,
            vec![
                furi!("/nat").add_component(&furi!("plus")),
                furi!("/num").add_component(&furi!("plus")),
            ]
        );
    }

    #[test]
    fn range_root_tries_its_value_id_first() {
        let graph = Graph::default()
            .with("/nat", Obj::type_of(OType::Int).with_tid(furi!("/nat?rng=/num")))
            .with(
                "/num",
                Obj::type_of(OType::Real)
                    .with_tid(furi!("/real"))
                    .with_vid(furi!("/num")),
            )
            .with("/num::plus", Obj::inst(furi!("/num::plus"), body()));
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/nat"));
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        assert!(matches!(resolution, Resolution::Found(_)));
        let last = log.probes().last().unwrap();
        assert_eq!(last.source, furi!("/num"));
        assert_eq!(log.probes().count(), 2);
    }

    #[test]
    fn value_ids_are_tried_on_every_ascent() {
        let graph = Graph::default()
            .with(
                "/nat",
                Obj::type_of(OType::Int)
                    .with_tid(furi!("/int"))
                    .with_vid(furi!("/nat")),
            )
            .with("/int::plus", Obj::inst(furi!("/int::plus"), body()));
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/nat")).with_vid(furi!("/x"));
        Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        let sources: Vec<String> = log.probes().map(|s| s.source.to_string()).collect();
        assert_eq!(sources, vec!["/x", "/nat", "/nat", "/int"]);
    }

    #[test]
    fn literal_bodies_are_the_fallback() {
        let graph = Graph::default();
        let mut log = Derivation::new();
        let inst = Obj::inst(furi!("plus"), body());
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&Obj::int(1), &inst)
            .unwrap();
        assert_eq!(resolution, Resolution::Literal(inst));
    }

    #[test]
    fn two_type_cycles_terminate() {
        let graph = Graph::default()
            .with("/a", Obj::type_of(OType::Int).with_tid(furi!("/b")))
            .with("/b", Obj::type_of(OType::Int).with_tid(furi!("/a")));
        let mut log = Derivation::new();
        let lhs = Obj::int(1).with_tid(furi!("/a"));
        let resolution = Resolver::new(&graph, &mut log)
            .resolve(&lhs, &reference("plus"))
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
        // two probes on the own chain, three from the range root /b
        assert_eq!(log.probes().count(), 5);
        let markers = log.steps().iter().filter(|s| s.is_marker()).count();
        assert_eq!(markers, 2);
    }
}
