//! An in-memory router: objects stored by fURI, plus namespace resolution.

use log::{debug, warn};

use fhatos_furi::{furi, Furi};

use crate::config::RouterConfig;
use crate::furi_trie::FuriTrie;
use crate::obj::{OType, Obj, OBJ_FURI};
use crate::{Error, Oracle};

/// Objects stored by id in a [`FuriTrie`].
///
/// Reads are total: an absent id reads as noobj. Reading below a stored record walks into its
/// fields, so with `/person` holding `[name=>'a']`, `/person/name` reads `'a'`.
#[derive(Debug, Clone)]
pub struct Router {
    objs: FuriTrie<Obj>,
    auto_prefixes: Vec<Furi>,
}

impl Default for Router {
    fn default() -> Self {
        Router::new(vec![furi!("/mmadt/")])
    }
}

impl Router {
    pub fn new(auto_prefixes: Vec<Furi>) -> Self {
        if auto_prefixes.is_empty() {
            warn!("router has no auto-prefixes: namespaces will not be expanded");
        }
        Router {
            objs: FuriTrie::new(),
            auto_prefixes,
        }
    }

    pub fn from_config(config: &RouterConfig) -> Result<Self, Error> {
        let mut router = Router::new(config.auto_prefixes.clone());
        if config.base_types {
            router.write_base_types();
        }
        for entry in &config.entries {
            router.write(&entry.id, entry.obj.to_obj()?);
        }
        Ok(router)
    }

    /// Write the prototype of every kind at its base id. Each kind's super type is `/mmadt/obj`,
    /// which is its own type.
    pub fn write_base_types(&mut self) {
        for otype in OType::ALL {
            let prototype = Obj::type_of(otype).with_tid(OBJ_FURI.clone());
            self.write(otype.base_id(), prototype);
        }
    }

    /// Store `obj` at `id`, returning what was there. Writing noobj removes.
    pub fn write(&mut self, id: &Furi, obj: Obj) -> Option<Obj> {
        if obj.is_noobj() {
            return self.remove(id);
        }
        debug!("write {} => {}", id, obj);
        self.objs.insert(id, obj.with_vid(id.no_query()))
    }

    pub fn remove(&mut self, id: &Furi) -> Option<Obj> {
        debug!("remove {}", id);
        self.objs.remove(id)
    }

    /// True if an object is stored at exactly `id`.
    pub fn has(&self, id: &Furi) -> bool {
        self.objs.contains(id)
    }

    /// Every stored object whose id matches `pattern`.
    pub fn query(&self, pattern: &Furi) -> Vec<Obj> {
        self.objs.matching(pattern).map(|(_, obj)| obj.clone()).collect()
    }

    pub fn auto_prefixes(&self) -> &[Furi] {
        &self.auto_prefixes
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    fn expand(&self, component: Furi) -> Furi {
        if self.has(&component) {
            return component;
        }
        let name = component.to_string();
        self.auto_prefixes
            .iter()
            .map(|prefix| prefix.extend(&name))
            .find(|candidate| self.has(candidate))
            .unwrap_or(component)
    }
}

impl Oracle for Router {
    fn read(&self, id: &Furi) -> Obj {
        if let Some(obj) = self.objs.get(id) {
            return obj.clone();
        }
        if let Some((_, obj, suffix)) = self.objs.find_ancestor(id) {
            if !suffix.is_empty() {
                let field = suffix
                    .iter()
                    .try_fold(obj, |current, key| current.rec_get(key));
                if let Some(field) = field {
                    return field.clone().with_vid(id.no_query());
                }
            }
        }
        Obj::noobj()
    }

    fn resolve_namespace(&self, furi: &Furi) -> Furi {
        if furi.empty() || (!furi.headless() && !furi.has_components()) {
            return furi.clone();
        }
        if self.has(furi) {
            return furi.clone();
        }
        let resolved = furi
            .no_query()
            .components()
            .into_iter()
            .map(|component| self.expand(component))
            .reduce(|joined, next| joined.add_component(&next));
        match resolved {
            Some(resolved) => {
                let resolved = resolved.with_query(furi.query().unwrap_or(""));
                debug!("namespace {} => {}", furi, resolved);
                resolved
            }
            None => furi.clone(),
        }
    }
}
