//! Describing which elements and components a mesh has.
//!
//! A [`MeshInfo`] is a plain record: it can be created from a live mesh to
//! find out what the mesh currently stores, or filled by hand to describe
//! what some import or export code wants to read or write. Intersecting two
//! infos gives what both have in common.

use std::fmt;

use crate::{
    comp::ComponentKind,
    handle::ElementKind,
    mesh::{Container, ContainerVisitor, Element, ElementContainers, FaceMesh, Mesh, MeshConfig},
};


/// The kind of faces of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeshType {
    Triangle,
    Quad,
    Polygon,
    #[default]
    Unknown,
}

impl MeshType {
    /// The mesh type of meshes whose faces have `arity` vertices (`None`
    /// meaning arbitrary polygons).
    pub fn from_arity(arity: Option<usize>) -> Self {
        match arity {
            Some(3) => MeshType::Triangle,
            Some(4) => MeshType::Quad,
            _ => MeshType::Polygon,
        }
    }
}

/// A named custom component and the name of its value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomComponentInfo {
    pub name: String,
    pub value_type: &'static str,
}

/// Which element kinds, which components per element kind and which mesh
/// level data are present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MeshInfo {
    elements: u8,
    components: [u32; 4],
    custom: [Vec<CustomComponentInfo>; 4],
    mesh_type: MeshType,
    textures: bool,
}

impl MeshInfo {
    /// An info without any elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describes what `mesh` currently has: all its element kinds, all
    /// components its elements store inline plus the enabled optional ones,
    /// and all custom components.
    pub fn from_mesh<M: FaceMesh>(mesh: &M) -> Self {
        let mut info = Self::new();
        mesh.visit_containers(&mut Collect(&mut info));
        info.mesh_type = MeshType::from_arity(M::FACE_VERTEX_NUMBER);
        info
    }

    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }

    /// Resets to the empty info.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn mesh_type(&self) -> MeshType {
        self.mesh_type
    }

    pub fn set_mesh_type(&mut self, mesh_type: MeshType) {
        self.mesh_type = mesh_type;
    }

    /// Adjusts the mesh type after seeing a face with `face_size` vertices:
    /// an unknown type becomes the type of that face, a triangle or quad
    /// mesh becomes a polygon mesh if the face does not fit.
    pub fn update_mesh_type(&mut self, face_size: usize) {
        self.mesh_type = match self.mesh_type {
            MeshType::Unknown => MeshType::from_arity(Some(face_size)),
            MeshType::Triangle if face_size != 3 => MeshType::Polygon,
            MeshType::Quad if face_size != 4 => MeshType::Polygon,
            other => other,
        };
    }

    pub fn has_element(&self, kind: ElementKind) -> bool {
        self.elements & element_bit(kind) != 0
    }

    /// Adds or removes an element kind. Removing it also removes all of its
    /// components.
    pub fn set_element(&mut self, kind: ElementKind, present: bool) {
        if present {
            self.elements |= element_bit(kind);
        } else {
            self.elements &= !element_bit(kind);
            self.components[kind.index()] = 0;
            self.custom[kind.index()].clear();
        }
    }

    pub fn has_component(&self, element: ElementKind, component: ComponentKind) -> bool {
        self.components[element.index()] & component.bit() != 0
    }

    /// Adds or removes a component. Adding a component adds its element
    /// kind, too.
    pub fn set_component(&mut self, element: ElementKind, component: ComponentKind, present: bool) {
        if present {
            self.set_element(element, true);
            self.components[element.index()] |= component.bit();
        } else {
            self.components[element.index()] &= !component.bit();
        }
    }

    /// All components present for `element`, in the order of
    /// `ComponentKind::ALL`.
    pub fn components(&self, element: ElementKind) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL.iter()
            .copied()
            .filter(move |&c| self.has_component(element, c))
    }

    pub fn custom_components(&self, element: ElementKind) -> &[CustomComponentInfo] {
        &self.custom[element.index()]
    }

    /// Adds a custom component description (replacing one with the same
    /// name) and marks `Custom` as present for `element`.
    pub fn add_custom_component(&mut self, element: ElementKind, name: &str, value_type: &'static str) {
        let list = &mut self.custom[element.index()];
        list.retain(|c| c.name != name);
        list.push(CustomComponentInfo { name: name.to_owned(), value_type });
        self.set_component(element, ComponentKind::Custom, true);
    }

    pub fn has_textures(&self) -> bool {
        self.textures
    }

    pub fn set_textures(&mut self, textures: bool) {
        self.textures = textures;
    }

    /// What `self` and `other` have in common. The mesh type is kept if both
    /// agree and is `Unknown` otherwise. Custom components are kept if both
    /// have one with the same name and value type.
    pub fn intersect(&self, other: &MeshInfo) -> MeshInfo {
        let mut out = MeshInfo {
            elements: self.elements & other.elements,
            mesh_type: if self.mesh_type == other.mesh_type {
                self.mesh_type
            } else {
                MeshType::Unknown
            },
            textures: self.textures && other.textures,
            ..MeshInfo::default()
        };

        for i in 0..4 {
            out.components[i] = self.components[i] & other.components[i];
            out.custom[i] = self.custom[i].iter()
                .filter(|c| other.custom[i].contains(c))
                .cloned()
                .collect();
        }

        out
    }
}

impl<C: MeshConfig> From<&Mesh<C>> for MeshInfo {
    fn from(mesh: &Mesh<C>) -> Self {
        let mut info = MeshInfo::from_mesh(mesh);
        info.set_textures(!mesh.textures().is_empty());
        info
    }
}

impl fmt::Debug for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct Components<'a>(&'a MeshInfo, ElementKind);
        impl fmt::Debug for Components<'_> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_list().entries(self.0.components(self.1)).finish()
            }
        }

        let mut s = f.debug_struct("MeshInfo");
        s.field("mesh_type", &self.mesh_type);
        for kind in ElementKind::ALL {
            if self.has_element(kind) {
                s.field(&kind.to_string(), &Components(self, kind));
            }
        }
        s.field("textures", &self.textures).finish()
    }
}

fn element_bit(kind: ElementKind) -> u8 {
    1 << kind.index()
}

struct Collect<'a>(&'a mut MeshInfo);

impl ContainerVisitor for Collect<'_> {
    fn visit<E: Element>(&mut self, container: &Container<E>) {
        self.0.set_element(E::KIND, true);
        for kind in ComponentKind::ALL {
            if kind != ComponentKind::Custom && container.has_component(kind) {
                self.0.set_component(E::KIND, kind, true);
            }
        }

        let custom = container.custom_components();
        let mut names = custom.names().collect::<Vec<_>>();
        names.sort_unstable();
        for name in names {
            if let Some(ty) = custom.value_type(name) {
                self.0.add_custom_component(E::KIND, name, ty);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::mesh::{
        configs::{HalfEdgeTriMesh, PolyMesh, TriEdgeMesh, TriMesh},
        HalfEdgeMesh,
    };
    use super::*;

    #[test]
    fn from_tri_mesh() {
        let mut m = Mesh::<TriMesh>::new();
        let info = MeshInfo::from(&m);
        assert_eq!(info.mesh_type(), MeshType::Triangle);
        assert!(info.has_element(ElementKind::Vertex));
        assert!(info.has_element(ElementKind::Face));
        assert!(!info.has_element(ElementKind::Edge));
        assert!(info.has_component(ElementKind::Vertex, ComponentKind::Coordinate));
        assert!(info.has_component(ElementKind::Face, ComponentKind::VertexReferences));
        assert!(!info.has_component(ElementKind::Face, ComponentKind::AdjacentFaces));
        assert!(!info.has_textures());

        m.faces_mut().enable_adj_faces();
        m.vertices_mut().add_custom_component::<f32>("weight");
        m.push_texture("wood.png");
        let info = MeshInfo::from(&m);
        assert!(info.has_component(ElementKind::Face, ComponentKind::AdjacentFaces));
        assert!(info.has_component(ElementKind::Vertex, ComponentKind::Custom));
        assert_eq!(
            info.custom_components(ElementKind::Vertex),
            &[CustomComponentInfo { name: "weight".into(), value_type: "f32" }],
        );
        assert!(info.has_textures());
    }

    #[test]
    fn other_mesh_kinds() {
        let info = MeshInfo::from_mesh(&Mesh::<TriEdgeMesh>::new());
        assert!(info.has_element(ElementKind::Edge));
        assert!(info.has_component(ElementKind::Edge, ComponentKind::VertexReferences));

        let info = MeshInfo::from_mesh(&HalfEdgeMesh::<HalfEdgeTriMesh>::new());
        assert!(info.has_element(ElementKind::HalfEdge));
        assert!(info.has_component(ElementKind::Face, ComponentKind::HalfEdgeReferences));
        assert!(!info.has_component(ElementKind::Face, ComponentKind::VertexReferences));

        assert_eq!(MeshInfo::from_mesh(&Mesh::<PolyMesh>::new()).mesh_type(), MeshType::Polygon);
    }

    #[test]
    fn intersection() {
        let mut a = MeshInfo::new();
        a.set_mesh_type(MeshType::Triangle);
        a.set_component(ElementKind::Vertex, ComponentKind::Coordinate, true);
        a.set_component(ElementKind::Vertex, ComponentKind::Normal, true);
        a.set_component(ElementKind::Face, ComponentKind::VertexReferences, true);
        a.add_custom_component(ElementKind::Vertex, "id", "u32");

        let mut b = MeshInfo::new();
        b.set_mesh_type(MeshType::Triangle);
        b.set_component(ElementKind::Vertex, ComponentKind::Coordinate, true);
        b.set_component(ElementKind::Vertex, ComponentKind::Color, true);
        b.add_custom_component(ElementKind::Vertex, "id", "u64");

        let c = a.intersect(&b);
        assert_eq!(c.mesh_type(), MeshType::Triangle);
        assert!(c.has_element(ElementKind::Vertex));
        assert!(!c.has_element(ElementKind::Face));
        assert_eq!(c.components(ElementKind::Vertex).collect::<Vec<_>>(), [
            ComponentKind::Coordinate,
            ComponentKind::Custom,
        ]);
        assert!(c.custom_components(ElementKind::Vertex).is_empty());

        b.set_mesh_type(MeshType::Quad);
        assert_eq!(a.intersect(&b).mesh_type(), MeshType::Unknown);
        assert_eq!(a.intersect(&a), a);

        a.set_element(ElementKind::Vertex, false);
        assert!(!a.has_component(ElementKind::Vertex, ComponentKind::Normal));
        a.clear();
        assert!(a.is_empty());
    }

    #[test]
    fn mesh_type_updates() {
        let mut info = MeshInfo::new();
        info.update_mesh_type(3);
        assert_eq!(info.mesh_type(), MeshType::Triangle);
        info.update_mesh_type(3);
        assert_eq!(info.mesh_type(), MeshType::Triangle);
        info.update_mesh_type(4);
        assert_eq!(info.mesh_type(), MeshType::Polygon);
        info.update_mesh_type(3);
        assert_eq!(info.mesh_type(), MeshType::Polygon);
    }
}
