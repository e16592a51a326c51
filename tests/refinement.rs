mod util;

use hier_mesh::prelude::*;
use hier_mesh::topology::cell_type::TRIANGLE_EDGE_CORNERS;
use hashbrown::HashSet;
use util::*;

#[test]
fn red_refinement_structure() {
    let mut mesh = two_triangles();
    let kids = mesh.refine_element(el(0)).unwrap();
    let parent = mesh.element(el(0)).unwrap();
    assert!(!parent.is_leaf());
    assert_eq!(parent.children(), &kids);

    for &k in &kids {
        let child = mesh.element(k).unwrap();
        assert_eq!(child.level(), 1);
        assert_eq!(child.parent(), Some(el(0)));
        assert!(child.is_leaf());
        // reference numbering holds on the finer level too
        for (slot, &(a, b)) in TRIANGLE_EDGE_CORNERS.iter().enumerate() {
            let edge = mesh.edge(child.edges()[slot]).unwrap();
            let ends: HashSet<_> = edge.vertices().into_iter().collect();
            let expected: HashSet<_> = [child.corners()[a], child.corners()[b]].into_iter().collect();
            assert_eq!(ends, expected);
            assert!(edge.elements().contains(&k));
        }
        let area = mesh.element_geometry(k).unwrap().volume();
        assert!((area - 0.125).abs() < 1e-12);
        // orientation is preserved
        let n = mesh.element_geometry(k).unwrap().unit_normal().unwrap();
        assert!(approx(n, [0.0, 0.0, 1.0]));
    }
    assert!(mesh.validate().is_ok());
}

#[test]
fn shared_bisection_is_reused() {
    let mut mesh = two_triangles();
    mesh.refine_element(el(0)).unwrap();
    let vertices_before = mesh.size(1, 2).unwrap();
    mesh.refine_element(el(1)).unwrap();
    // one new corner copy (v3) and two new midpoints
    assert_eq!(mesh.size(1, 2).unwrap(), vertices_before + 3);
    assert_eq!(mesh.size(1, 1).unwrap(), 16);

    // the halves of the shared edge now list one child of each side
    let shared = mesh.element(el(0)).unwrap().edges()[2];
    let halves = mesh.edge(shared).unwrap().children().unwrap();
    for h in halves {
        let incident = mesh.edge(h).unwrap().elements();
        assert_eq!(incident.len(), 2);
        let parents: Vec<_> = incident
            .iter()
            .map(|&e| mesh.element(e).unwrap().parent().unwrap())
            .collect();
        assert_eq!(parents, vec![el(0), el(1)]);
    }
}

#[test]
fn halves_inherit_boundary_ids() {
    let mut mesh = two_triangles();
    mesh.global_refine(1).unwrap();
    for (_, edge) in mesh.edges() {
        if let Some(halves) = edge.children() {
            for h in halves {
                assert_eq!(mesh.edge(h).unwrap().boundary_id(), edge.boundary_id());
            }
        }
    }
    let fine_boundary = mesh
        .edges()
        .filter(|(_, e)| e.level() == 1 && e.boundary_id().is_some())
        .count();
    assert_eq!(fine_boundary, 8);
}

#[test]
fn vertex_copies_link_levels() {
    let mut mesh = two_triangles();
    mesh.refine_element(el(0)).unwrap();
    let v0 = mesh.element(el(0)).unwrap().corners()[0];
    let copy = mesh.vertex(v0).unwrap().child().unwrap();
    let rec = mesh.vertex(copy).unwrap();
    assert_eq!(rec.level(), 1);
    assert_eq!(rec.parent(), Some(v0));
    assert_eq!(rec.position(), mesh.vertex(v0).unwrap().position());
    assert!(rec.is_leaf());
    assert!(!mesh.vertex(v0).unwrap().is_leaf());
    // v3 is not touched by the refined element
    let v3 = mesh.element(el(1)).unwrap().corners()[1];
    assert!(mesh.vertex(v3).unwrap().is_leaf());
}

#[test]
fn refining_a_refined_element_fails() {
    let mut mesh = two_triangles();
    mesh.refine_element(el(0)).unwrap();
    assert_eq!(mesh.refine_element(el(0)), Err(MeshError::NotLeaf(0)));
}

#[test]
fn mark_and_adapt() {
    let mut mesh = two_triangles();
    assert!(mesh.mark(el(1), MarkState::Refine).unwrap());
    assert_eq!(mesh.element(el(1)).unwrap().mark(), MarkState::Refine);
    let edges = mesh.element(el(1)).unwrap().edges();
    assert!(edges.iter().all(|&e| mesh.edge(e).unwrap().mark() == MarkState::Refine));

    assert!(mesh.adapt().unwrap());
    assert!(!mesh.element(el(1)).unwrap().is_leaf());
    assert!(mesh.element(el(0)).unwrap().is_leaf());
    assert_eq!(mesh.element(el(1)).unwrap().mark(), MarkState::DoNothing);
    assert!(mesh.edges().all(|(_, e)| e.mark() == MarkState::DoNothing));

    // nothing left to do, and refined elements cannot be marked
    assert!(!mesh.adapt().unwrap());
    assert!(!mesh.mark(el(1), MarkState::Refine).unwrap());
}

#[test]
fn geometry_check_before_refinement() {
    let mut mesh = MeshBuilder::from_raw(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
        &[[0, 1, 2]],
    )
    .unwrap();
    assert!(mesh.mark(el(0), MarkState::Refine).unwrap());
    assert!(matches!(
        mesh.adapt_with(RefineOptions {
            check_geometry: true
        }),
        Err(MeshError::InvalidGeometry(_))
    ));
    assert!(mesh.element(el(0)).unwrap().is_leaf());
}

#[test]
fn ids_survive_refinement() {
    let mut mesh = two_triangles();
    let before: Vec<GlobalId> = mesh.elements().map(|(_, e)| e.id()).collect();
    let vertex_before: Vec<GlobalId> = mesh.vertices().map(|(_, v)| v.id()).collect();
    mesh.global_refine(2).unwrap();

    let after: Vec<GlobalId> = mesh.elements().take(2).map(|(_, e)| e.id()).collect();
    assert_eq!(before, after);
    let vertex_after: Vec<GlobalId> = mesh.vertices().take(4).map(|(_, v)| v.id()).collect();
    assert_eq!(vertex_before, vertex_after);

    let ids: HashSet<GlobalId> = mesh.elements().map(|(_, e)| e.id()).collect();
    assert_eq!(ids.len(), 2 + 8 + 32);
    let edge_ids: HashSet<GlobalId> = mesh.edges().map(|(_, e)| e.id()).collect();
    assert_eq!(edge_ids.len(), mesh.edges().count());
}

#[test]
fn geometry_in_parent() {
    let mut mesh = two_triangles();
    let kids = mesh.refine_element(el(0)).unwrap();

    let corner = mesh.geometry_in_parent(kids[0]).unwrap();
    assert!(approx2(corner.corners()[0], [0.0, 0.0]));
    assert!(approx2(corner.corners()[1], [0.5, 0.0]));
    assert!(approx2(corner.corners()[2], [0.0, 0.5]));
    assert!((corner.integration_element() - 0.25).abs() < 1e-12);

    let inner = mesh.geometry_in_parent(kids[3]).unwrap();
    assert!(approx2(inner.corners()[0], [0.5, 0.0]));
    assert!(approx2(inner.corners()[1], [0.5, 0.5]));
    assert!(approx2(inner.corners()[2], [0.0, 0.5]));

    assert_eq!(mesh.geometry_in_parent(el(1)), Err(MeshError::NoParent(1)));
}

#[test]
fn descendants_in_stack_order() {
    let mut mesh = two_triangles();
    mesh.global_refine(2).unwrap();
    let kids = mesh.element(el(0)).unwrap().children().to_vec();

    let one_level: Vec<_> = mesh.descendants(el(0), 1).unwrap().collect();
    assert_eq!(one_level, vec![kids[3], kids[2], kids[1], kids[0]]);

    let all: Vec<_> = mesh.descendants(el(0), 2).unwrap().collect();
    assert_eq!(all.len(), 4 + 16);
    let grandkids = mesh.element(kids[3]).unwrap().children().to_vec();
    assert_eq!(&all[..2], &[kids[3], grandkids[3]]);
    assert!(all.iter().all(|&e| mesh.element(e).unwrap().level() <= 2));

    assert_eq!(mesh.descendants(el(0), 0).unwrap().count(), 0);
    assert_eq!(mesh.descendants(kids[0], 1).unwrap().count(), 0);
    assert_eq!(mesh.descendants(kids[0], 5).unwrap().count(), 4);
}

#[test]
fn descendant_iterators_compare_by_position() {
    let mut mesh = two_triangles();
    mesh.global_refine(1).unwrap();
    let mut a = mesh.descendants(el(0), 1).unwrap();
    let b = mesh.descendants(el(0), 1).unwrap();
    assert!(a == b);
    assert_eq!(a.current(), a.clone().next());
    a.next();
    assert!(a != b);
    a.by_ref().for_each(drop);
    let empty = mesh.descendants(el(1), 0).unwrap();
    assert!(a == empty);
}

#[test]
fn entity_queries() {
    let mesh = two_triangles();
    let b = EntityHandle::from(el(1));
    assert_eq!(mesh.partition_type(b).unwrap(), PartitionType::Interior);
    assert_eq!(mesh.entity_level(b).unwrap(), 0);
    assert_eq!(mesh.sub_entity_count(b, 2).unwrap(), 3);
    let v = mesh.sub_entity(b, 1, 2).unwrap();
    assert_eq!(mesh.sub_entity_count(v, 2).unwrap(), 1);
    assert!(mesh.partition_type(EntityHandle::from(el(7))).is_err());
}
