use crate::{
    handle::VertexHandle,
    mesh::FaceMeshMut,
};


/// Builds a mesh from plain coordinates and faces given as vertex indices.
pub(crate) fn build_mesh<M: FaceMeshMut>(coords: &[[f64; 3]], faces: &[&[usize]]) -> M {
    let mut m = M::default();
    let vertices = coords.iter()
        .map(|&c| m.add_vertex(c.into()))
        .collect::<Vec<_>>();
    for face in faces {
        let handles = face.iter().map(|&i| vertices[i]).collect::<Vec<VertexHandle>>();
        if let Err(e) = m.add_face(&handles) {
            panic!("failed to add face {:?}: {}", face, e);
        }
    }
    m
}

macro_rules! test_helper {
    () => { compile_error!("internal macro: don't use anywhere else") };

    // Expands to `$body` if `$needle` is one of the listed extras and to an
    // empty expression otherwise.
    (@if $needle:ident in [] => $body:tt) => {{
        // Not requested. Still reject misspelled extras.
        test_helper!(@is_valid_extra_trait $needle);
    }};
    (@if $needle:ident in [$head:ident $(, $tail:ident)*] => $body:tt) => {{
        // Ident comparison: the first arm only matches if both are equal.
        macro_rules! __inner_helper {
            ($needle $needle) => { $body };
            ($needle $head) => { test_helper!(@if $needle in [$($tail),*] => $body) }
        }

        __inner_helper!($needle $head)
    }};

    // Same for bodies that are items.
    (@if_item [$needle:ident] in [] => { $($body:tt)* }) => {
        test_helper!(@is_valid_extra_trait $needle);
    };
    (@if_item [$needle:ident] in [$head:ident $(, $tail:ident)*] => { $($body:tt)* }) => {
        macro_rules! __inner_helper {
            ($needle $needle) => { $($body)* };
            ($needle $head) => {
                test_helper!(@if_item [$needle] in [$($tail),*] => { $($body)* });
            }
        }

        __inner_helper!($needle $head);
    };

    // Known extras of `gen_mesh_tests`.
    (@is_valid_extra_trait FaceAdjMeshMut) => {};
    (@is_valid_extra_trait Polygons) => {};
    (@is_valid_extra_trait $other:ident) => {
        compile_error!(concat!(
            "`",
            stringify!($other),
            "` is not a valid extra to pass to `gen_mesh_tests`",
        ));
    };
}
