//! Filling meshes from dense matrices.
//!
//! A matrix is passed as a [`MatrixView`]: a borrowed slice plus its
//! dimensions and memory layout. Vertex matrices have one row per vertex and
//! three columns; face matrices one row per face and one column per face
//! vertex; edge matrices two columns.
//!
//! Rows of face matrices can describe polygons with fewer vertices than the
//! matrix has columns: the first negative entry ends the row. Triangle
//! meshes triangulate longer rows when the faces are replaced (each polygon
//! becomes several triangles with faux inner edges).
//!
//! Every function checks all dimensions and indices first and returns
//! `Error::WrongSize` (or `Error::BadVertexIndex`) without modifying the
//! mesh.

use tracing::debug;

use crate::{
    algo::face_topology::add_new_triangle_faces_from_polygon,
    comp::{Color, ComponentKind, HasColor, HasNormal, HasQuality, Normal},
    error::{BadIndexReason, Error, Result},
    handle::{EdgeHandle, FaceHandle, Handle, VertexHandle},
    mesh::{
        shared_vertex::check_face_size, Arity, Container, Element, FaceConfig, FaceMesh, Mesh,
        MeshConfig,
    },
};


// ===========================================================================
// ===== MatrixView
// ===========================================================================

/// Order of the entries in the slice of a [`MatrixView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Rows are stored one after another.
    RowMajor,

    /// Columns are stored one after another.
    ColumnMajor,
}

/// A read only view of a dense matrix stored in a slice.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    layout: Layout,
}

impl<'a, T: Copy> MatrixView<'a, T> {
    /// Returns `Error::WrongSize` if `data` does not have exactly
    /// `rows * cols` entries.
    pub fn new(data: &'a [T], rows: usize, cols: usize, layout: Layout) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::WrongSize(format!(
                "a {}x{} matrix needs {} entries, but {} were given",
                rows,
                cols,
                rows.saturating_mul(cols),
                data.len(),
            )));
        }

        Ok(Self { data, rows, cols, layout })
    }

    pub fn row_major(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::new(data, rows, cols, Layout::RowMajor)
    }

    pub fn column_major(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::new(data, rows, cols, Layout::ColumnMajor)
    }

    /// A row major view of a list of fixed size rows.
    pub fn from_rows<const N: usize>(rows: &'a [[T; N]]) -> Self {
        Self {
            data: rows.as_flattened(),
            rows: rows.len(),
            cols: N,
            layout: Layout::RowMajor,
        }
    }

    /// The matrix with zero rows and zero columns.
    pub fn empty() -> Self {
        Self {
            data: &[],
            rows: 0,
            cols: 0,
            layout: Layout::RowMajor,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The entry in row `r` and column `c`.
    ///
    /// # Panics
    ///
    /// If `r` or `c` is out of bounds.
    pub fn get(&self, r: usize, c: usize) -> T {
        assert!(r < self.rows && c < self.cols, "({}, {}) out of bounds", r, c);
        match self.layout {
            Layout::RowMajor => self.data[r * self.cols + c],
            Layout::ColumnMajor => self.data[c * self.rows + r],
        }
    }

    /// The entries of row `r`.
    pub fn row(&self, r: usize) -> impl Iterator<Item = T> + '_ {
        (0..self.cols).map(move |c| self.get(r, c))
    }
}


// ===========================================================================
// ===== Whole meshes
// ===========================================================================

/// Replaces all elements of `mesh` by the given vertices, faces and edges.
/// Pass [`MatrixView::empty`] for `faces` or `edges` to import none.
///
/// Enabled optional components stay enabled; their values are reset.
pub fn import_mesh_from_matrices<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    vertices: MatrixView<'_, f64>,
    faces: MatrixView<'_, i64>,
    edges: MatrixView<'_, i64>,
) -> Result<()> {
    check_cols("vertex", &vertices, 3)?;
    let num_vertices = vertices.rows();
    let in_range = |index: usize| check_new_vertex(index, num_vertices);
    let polygons = face_rows::<C>(&faces, true, in_range)?;
    let edge_list = edge_rows(&edges, in_range)?;

    mesh.clear();
    fill_vertices(mesh, &vertices);
    fill_faces(mesh, &polygons)?;
    for [a, b] in edge_list {
        mesh.add_edge(a, b)?;
    }

    debug!(
        "imported mesh with {} vertices, {} faces and {} edges",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_edges(),
    );
    Ok(())
}

/// Sets the vertex positions from a matrix with three columns.
///
/// With `clear`, all vertices are replaced by one vertex per row (all vertex
/// references become null). Otherwise the matrix must have one row per live
/// vertex, which are updated in handle order.
pub fn import_vertices_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    vertices: MatrixView<'_, f64>,
    clear: bool,
) -> Result<()> {
    check_cols("vertex", &vertices, 3)?;
    if clear {
        mesh.clear_vertices();
        fill_vertices(mesh, &vertices);
    } else {
        check_rows("vertex", &vertices, mesh.num_vertices())?;
        let handles = mesh.vertices().handles().collect::<Vec<_>>();
        for (r, v) in handles.into_iter().enumerate() {
            let p = [vertices.get(r, 0), vertices.get(r, 1), vertices.get(r, 2)];
            mesh.vertices_mut().set_coord(v, p.into());
        }
    }

    Ok(())
}

/// Sets the face vertices from a matrix of vertex indices.
///
/// With `clear`, all faces are replaced by the faces in the matrix
/// (triangle meshes triangulate rows with more than three vertices).
/// Otherwise the matrix must have one row per live face; the vertex lists of
/// the faces are replaced in handle order.
pub fn import_faces_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    faces: MatrixView<'_, i64>,
    clear: bool,
) -> Result<()> {
    let polygons = face_rows::<C>(&faces, clear, |index| check_live_vertex(mesh.vertices(), index))?;

    if clear {
        mesh.clear_faces();
        fill_faces(mesh, &polygons)?;
    } else {
        check_rows("face", &faces, mesh.num_faces())?;
        let handles = mesh.faces().handles().collect::<Vec<_>>();
        for (f, polygon) in handles.into_iter().zip(&polygons) {
            mesh.set_face_vertices(f, polygon)?;
        }
    }

    Ok(())
}

/// Sets the edge endpoints from a matrix with two columns.
///
/// With `clear`, all edges are replaced. Otherwise the matrix must have one
/// row per live edge.
pub fn import_edges_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    edges: MatrixView<'_, i64>,
    clear: bool,
) -> Result<()> {
    let list = edge_rows(&edges, |index| check_live_vertex(mesh.vertices(), index))?;

    if clear {
        mesh.clear_edges();
        for [a, b] in list {
            mesh.add_edge(a, b)?;
        }
    } else {
        check_rows("edge", &edges, mesh.num_edges())?;
        let handles = mesh.edges().handles().collect::<Vec<EdgeHandle>>();
        for (e, [a, b]) in handles.into_iter().zip(list) {
            mesh.edges_mut().set_endpoints(e, a, b);
        }
    }

    Ok(())
}


// ===========================================================================
// ===== Per element values
// ===========================================================================

/// Sets the normals of all live elements of `container` (in handle order)
/// from a matrix with three columns and one row per element.
pub fn import_normals_from_matrix<E: HasNormal>(
    container: &mut Container<E>,
    normals: MatrixView<'_, f64>,
) -> Result<()> {
    check_cols("normal", &normals, 3)?;
    check_rows("normal", &normals, container.num_elements())?;
    require(container.is_normal_enabled(), E::KIND, ComponentKind::Normal)?;

    let handles = container.handles().collect::<Vec<_>>();
    for (r, h) in handles.into_iter().enumerate() {
        *container.normal_mut(h)? = Normal::new(normals.get(r, 0), normals.get(r, 1), normals.get(r, 2));
    }
    Ok(())
}

/// Sets the colors of all live elements of `container` from a matrix with
/// three (RGB) or four (RGBA) columns. Without alpha column, colors are
/// opaque.
pub fn import_colors_from_matrix<E: HasColor>(
    container: &mut Container<E>,
    colors: MatrixView<'_, u8>,
) -> Result<()> {
    if colors.cols() != 3 && colors.cols() != 4 {
        return Err(Error::WrongSize(format!(
            "color matrix must have 3 or 4 columns, but has {}",
            colors.cols(),
        )));
    }
    check_rows("color", &colors, container.num_elements())?;
    require(container.is_color_enabled(), E::KIND, ComponentKind::Color)?;

    let handles = container.handles().collect::<Vec<_>>();
    for (r, h) in handles.into_iter().enumerate() {
        let a = if colors.cols() == 4 { colors.get(r, 3) } else { 255 };
        *container.color_mut(h)? = Color {
            r: colors.get(r, 0),
            g: colors.get(r, 1),
            b: colors.get(r, 2),
            a,
        };
    }
    Ok(())
}

/// Sets the quality of all live elements of `container`, one value per
/// element.
pub fn import_quality_from_slice<E: HasQuality>(container: &mut Container<E>, quality: &[f64]) -> Result<()> {
    if quality.len() != container.num_elements() {
        return Err(Error::WrongSize(format!(
            "expected {} quality values, but {} were given",
            container.num_elements(),
            quality.len(),
        )));
    }
    require(container.is_quality_enabled(), E::KIND, ComponentKind::Quality)?;

    let handles = container.handles().collect::<Vec<_>>();
    for (h, &q) in handles.into_iter().zip(quality) {
        *container.quality_mut(h)? = q;
    }
    Ok(())
}

pub fn import_vertex_normals_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    normals: MatrixView<'_, f64>,
) -> Result<()>
where
    crate::mesh::Vertex<C::Vertex>: HasNormal,
{
    import_normals_from_matrix(mesh.vertices_mut(), normals)
}

pub fn import_face_normals_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    normals: MatrixView<'_, f64>,
) -> Result<()>
where
    crate::mesh::Face<C::Face>: HasNormal,
{
    import_normals_from_matrix(mesh.faces_mut(), normals)
}

pub fn import_vertex_colors_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    colors: MatrixView<'_, u8>,
) -> Result<()>
where
    crate::mesh::Vertex<C::Vertex>: HasColor,
{
    import_colors_from_matrix(mesh.vertices_mut(), colors)
}

pub fn import_face_colors_from_matrix<C: MeshConfig>(
    mesh: &mut Mesh<C>,
    colors: MatrixView<'_, u8>,
) -> Result<()>
where
    crate::mesh::Face<C::Face>: HasColor,
{
    import_colors_from_matrix(mesh.faces_mut(), colors)
}


// ===========================================================================
// ===== Helpers
// ===========================================================================

fn check_cols<T: Copy>(what: &str, m: &MatrixView<'_, T>, expected: usize) -> Result<()> {
    if m.cols() == expected {
        Ok(())
    } else {
        Err(Error::WrongSize(format!(
            "{} matrix must have {} columns, but has {}",
            what,
            expected,
            m.cols(),
        )))
    }
}

fn check_rows<T: Copy>(what: &str, m: &MatrixView<'_, T>, expected: usize) -> Result<()> {
    if m.rows() == expected {
        Ok(())
    } else {
        Err(Error::WrongSize(format!(
            "{} matrix must have one row per element ({}), but has {} rows",
            what,
            expected,
            m.rows(),
        )))
    }
}

fn require(enabled: bool, element: crate::handle::ElementKind, component: ComponentKind) -> Result<()> {
    if enabled {
        Ok(())
    } else {
        Err(Error::missing(element, component))
    }
}

/// Checks an index into vertices that are about to be created.
fn check_new_vertex(index: usize, num_vertices: usize) -> Result<VertexHandle> {
    if index < num_vertices {
        Ok(VertexHandle::from_usize(index))
    } else {
        Err(Error::BadVertexIndex {
            index,
            reason: BadIndexReason::OutOfRange { container_size: num_vertices },
        })
    }
}

fn check_live_vertex<E: Element<Handle = VertexHandle>>(
    vertices: &Container<E>,
    index: usize,
) -> Result<VertexHandle> {
    let v = check_new_vertex(index, vertices.container_size())?;
    vertices.check_handle(v).map_err(|reason| Error::BadVertexIndex { index, reason })?;
    Ok(v)
}

fn to_index(entry: i64, r: usize) -> Result<usize> {
    usize::try_from(entry)
        .map_err(|_| Error::WrongSize(format!("negative vertex index {} in row {}", entry, r)))
}

/// Reads the vertex lists of all rows. Rows end at the first negative
/// entry. With `triangulate`, triangle meshes accept rows with more than
/// three vertices.
fn face_rows<C: MeshConfig>(
    faces: &MatrixView<'_, i64>,
    triangulate: bool,
    check: impl Fn(usize) -> Result<VertexHandle>,
) -> Result<Vec<Vec<VertexHandle>>> {
    let arity = <<C::Face as FaceConfig>::Arity as Arity>::VERTEX_NUMBER;

    let mut out = Vec::with_capacity(faces.rows());
    for r in 0..faces.rows() {
        let polygon = faces.row(r)
            .take_while(|&x| x >= 0)
            .map(|x| to_index(x, r).and_then(&check))
            .collect::<Result<Vec<_>>>()?;

        let size_ok = if triangulate && arity == Some(3) {
            polygon.len() >= 3
        } else {
            check_face_size::<<C::Face as FaceConfig>::Arity>(polygon.len()).is_ok()
        };
        if !size_ok {
            return Err(Error::WrongSize(format!(
                "row {} of the face matrix has {} vertices, which the faces of this mesh \
                    cannot store",
                r,
                polygon.len(),
            )));
        }

        out.push(polygon);
    }

    Ok(out)
}

fn edge_rows(
    edges: &MatrixView<'_, i64>,
    check: impl Fn(usize) -> Result<VertexHandle>,
) -> Result<Vec<[VertexHandle; 2]>> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }
    check_cols("edge", edges, 2)?;

    (0..edges.rows())
        .map(|r| {
            let a = check(to_index(edges.get(r, 0), r)?)?;
            let b = check(to_index(edges.get(r, 1), r)?)?;
            Ok([a, b])
        })
        .collect()
}

fn fill_vertices<C: MeshConfig>(mesh: &mut Mesh<C>, vertices: &MatrixView<'_, f64>) {
    mesh.reserve_vertices(vertices.rows());
    for r in 0..vertices.rows() {
        mesh.add_vertex([vertices.get(r, 0), vertices.get(r, 1), vertices.get(r, 2)].into());
    }
}

/// Adds all polygons, which have been checked by `face_rows`.
fn fill_faces<C: MeshConfig>(mesh: &mut Mesh<C>, polygons: &[Vec<VertexHandle>]) -> Result<()> {
    mesh.reserve_faces(polygons.len());
    for polygon in polygons {
        if <Mesh<C> as FaceMesh>::FACE_VERTEX_NUMBER == Some(3) && polygon.len() > 3 {
            add_new_triangle_faces_from_polygon(mesh, polygon)?;
        } else {
            let _: FaceHandle = mesh.add_face(polygon)?;
        }
    }
    Ok(())
}
