//! Consistency checks of the internal references of a mesh.

use optional::Optioned as Opt;

use crate::{
    comp::{ComponentKind, RefVisitor},
    error::{Error, Result},
    handle::{ElementKind, Handle},
    mesh::{traits::container_sizes, Container, ContainerVisitor, Element, ElementContainers, MeshId},
};


/// Checks that every container belongs to `mesh` and that every reference
/// stored anywhere in the mesh is either null or points into the container
/// of its kind.
///
/// The walk is fully generic: it visits every container the mesh exposes and
/// every reference component of every element (deleted ones included, as
/// their references are rewritten on compaction just like live ones). The
/// first problem found is returned as `Error::InconsistentMesh`.
pub fn check_mesh_pointers<M: ElementContainers>(mesh: &M) -> Result<()> {
    let mut checker = Checker {
        mesh: mesh.mesh_id(),
        sizes: container_sizes(mesh),
        error: None,
    };
    mesh.visit_containers(&mut checker);

    match checker.error {
        Some(msg) => Err(Error::InconsistentMesh(msg)),
        None => Ok(()),
    }
}

struct Checker {
    mesh: MeshId,
    sizes: [Option<usize>; 4],
    error: Option<String>,
}

impl ContainerVisitor for Checker {
    fn visit<E: Element>(&mut self, container: &Container<E>) {
        if self.error.is_some() {
            return;
        }

        if container.owner() != self.mesh {
            self.error = Some(format!(
                "{} container belongs to {:?}, not to {:?}",
                E::KIND,
                container.owner(),
                self.mesh,
            ));
            return;
        }

        for idx in 0..container.container_size() {
            let mut refs = RefChecker {
                sizes: self.sizes,
                bad: None,
            };
            container.visit_element_refs(idx, &mut refs);

            if let Some((component, kind, target)) = refs.bad {
                let problem = match self.sizes[kind.index()] {
                    Some(size) => format!("points to {}, but there are only {} slots", target, size),
                    None => format!("points to {}, but the mesh has no {} container", target, kind),
                };
                self.error = Some(format!(
                    "{} component of {} {} {}",
                    component,
                    E::KIND,
                    idx,
                    problem,
                ));
                return;
            }
        }
    }
}

/// Remembers the first reference pointing outside of its container.
struct RefChecker {
    sizes: [Option<usize>; 4],
    bad: Option<(ComponentKind, ElementKind, String)>,
}

impl RefVisitor for RefChecker {
    fn visit<H: Handle>(&mut self, component: ComponentKind, refs: &[Opt<H>]) {
        if self.bad.is_some() {
            return;
        }

        let size = self.sizes[H::KIND.index()];
        let out_of_range = refs.iter()
            .filter_map(|r| r.into_option())
            .find(|h| size.map(|size| h.to_usize() >= size).unwrap_or(true));

        if let Some(h) = out_of_range {
            self.bad = Some((component, H::KIND, format!("{:?}", h)));
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::{
        handle::{FaceHandle, VertexHandle},
        mesh::{configs::TriMesh, FaceAdjMeshMut, Mesh},
        shape,
    };
    use super::*;

    #[test]
    fn valid_meshes() {
        let m: Mesh<TriMesh> = shape::icosahedron();
        check_mesh_pointers(&m).unwrap();

        let copy = m.clone();
        check_mesh_pointers(&copy).unwrap();
    }

    #[test]
    fn dangling_face_reference() {
        let mut m: Mesh<TriMesh> = shape::triangle_strip(3);
        m.faces_mut().enable_adj_faces();
        m.set_adj_face(FaceHandle::new(0), 0, Some(FaceHandle::new(40)));

        match check_mesh_pointers(&m) {
            Err(Error::InconsistentMesh(msg)) => {
                assert!(msg.contains("AdjacentFaces"), "unexpected message: {}", msg);
                assert!(msg.contains("F40"), "unexpected message: {}", msg);
            }
            other => panic!("expected an inconsistency, got {:?}", other),
        }
    }

    #[test]
    fn dangling_vertex_reference() {
        let mut m: Mesh<TriMesh> = shape::triangle_strip(2);
        m.faces_mut().set_vertex(FaceHandle::new(1), 2, VertexHandle::new(99));
        assert!(matches!(check_mesh_pointers(&m), Err(Error::InconsistentMesh(_))));

        // Compaction leaves no dangling references behind.
        m.faces_mut().set_vertex(FaceHandle::new(1), 2, VertexHandle::new(0));
        m.delete_vertex(VertexHandle::new(1));
        m.compact();
        check_mesh_pointers(&m).unwrap();
    }
}
