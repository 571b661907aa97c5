// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end mesh preparation: OBJ text through classification,
//! clipping, dedup and the binary PLY writer.

use tactile_prep_mesh::{
    classify_and_clip, dedupe_triangles, signed_area2, write_binary_ply, ClipRect, Group, ObjMesh,
};

// Two buildings sharing an edge, one road sticking out past max_x, and a
// building entrance that must vanish. OBJ plane y is -z.
const FIXTURE: &str = concat!(
    "# tactile map export\n",
    "o Building.001\n",
    "v 1 0 -1\n",
    "v 3 0 -1\n",
    "v 3 0 -3\n",
    "v 1 0 -3\n",
    "f 1 2 3 4\n",
    "o BuildingEntrance.001\n",
    "v 1 0 -1\n",
    "v 2 0 -1\n",
    "v 1 0 -2\n",
    "f 5 6 7\n",
    "o Road.7\n",
    "v 8 0 -2\n",
    "v 12 0 -2\n",
    "v 8 0 -6\n",
    "f 8 9 10\n"
);

fn rect() -> ClipRect {
    ClipRect::new(0.0, 0.0, 10.0, 10.0)
}

#[test]
fn buckets_dedupe_and_serialize() {
    let mesh = ObjMesh::parse(FIXTURE);
    let (buckets, stats) = classify_and_clip(&mesh, &rect());

    assert_eq!(stats.objects_seen, 3);
    assert_eq!(stats.objects_skipped, 1);
    // Building quad fans to 2, plus the entrance and road triangles.
    assert_eq!(stats.input_triangles, 4);
    assert_eq!(stats.dropped_triangles, 1);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].group, Group::RoadsCar);
    assert_eq!(buckets[1].group, Group::Buildings);

    // The building quad fans into two triangles sharing an edge; dedup
    // collapses the shared corners to 4 distinct vertices.
    let building = dedupe_triangles(&buckets[1].triangles, 1e6);
    assert_eq!(building.vertices.len(), 4);
    assert_eq!(building.faces.len(), 2);
    assert_eq!(building.dropped_collapsed, 0);

    // The clipped road polygon keeps its winding after re-fanning.
    for tri in &buckets[0].triangles {
        assert!(signed_area2(tri[0], tri[1], tri[2]).abs() > 0.0);
    }
    let road = dedupe_triangles(&buckets[0].triangles, 1e6);
    assert!(road.faces.len() >= 2); // clipped quad fans into >= 2 triangles
    assert!(road.vertices.iter().all(|v| v.x <= 10.0));

    let mut ply = Vec::new();
    write_binary_ply(&mut ply, &building.vertices, &building.faces).unwrap();
    let header_end = b"end_header\n";
    let pos = ply
        .windows(header_end.len())
        .position(|w| w == header_end)
        .unwrap()
        + header_end.len();
    assert_eq!(ply.len() - pos, 4 * 12 + 2 * 13);
}

#[test]
fn vertex_identity_is_bucket_scoped() {
    // The entrance shares coordinates with the building, but buckets
    // never see each other's interner.
    let mesh = ObjMesh::parse(FIXTURE);
    let (buckets, _) = classify_and_clip(&mesh, &rect());

    let road = dedupe_triangles(&buckets[0].triangles, 1e6);
    let building = dedupe_triangles(&buckets[1].triangles, 1e6);
    // Index 0 exists in both buckets yet refers to different coordinates.
    assert_ne!(road.vertices[0], building.vertices[0]);
}
