// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON dump of a subtree.
//!
//! [`snapshot`] captures every node below a root with its local properties
//! and the computed values (world transform, world alpha, cached bounds) left
//! by the last traversal. It does not run any traversal itself, so the dump
//! shows exactly what a backend would see.

use std::io::{self, Write};

use arbor_core::filter::Filter;
use arbor_core::node::{DisplayTree, Mask, NodeId};
use kurbo::{Affine, Rect};
use serde_json::{Value, json};

/// Serializes `root` and its descendants.
///
/// Each node becomes an object with its slot index, generation, flags,
/// local transform, computed state, attachments, and a `children` array in
/// index order.
#[must_use]
pub fn snapshot(tree: &DisplayTree, root: NodeId) -> Value {
    let transform = tree.transform(root);
    let flags = tree.flags(root);
    let children: Vec<Value> = tree.children(root).map(|c| snapshot(tree, c)).collect();

    json!({
        "id": root.index(),
        "generation": root.generation(),
        "stage": tree.stage(root).map(|s| s.index()),
        "visible": flags.visible,
        "interactive": flags.interactive,
        "alpha": tree.alpha(root),
        "position": [transform.position.x, transform.position.y],
        "scale": [transform.scale.x, transform.scale.y],
        "rotation": transform.rotation,
        "pivot": [transform.pivot.x, transform.pivot.y],
        "world_transform": affine_json(tree.world_transform(root)),
        "world_alpha": tree.world_alpha(root),
        "bounds": tree.cached_bounds(root).map(rect_json),
        "content": tree.content(root).map(|c| json!({
            "surface": c.surface.0,
            "frame": rect_json(c.frame),
        })),
        "cached_bitmap": tree.cached_bitmap(root).map(|b| json!({
            "surface": b.surface.0,
            "frame": b.frame.map(rect_json),
        })),
        "mask": tree.mask(root).map(mask_json),
        "filters": tree.filters(root).iter().map(filter_json).collect::<Vec<_>>(),
        "children": children,
    })
}

/// Writes the [`snapshot`] of `root` as pretty-printed JSON.
pub fn write_snapshot(tree: &DisplayTree, root: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &snapshot(tree, root))?;
    Ok(())
}

pub(crate) fn rect_json(r: Rect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

fn affine_json(a: Affine) -> Value {
    json!(a.as_coeffs())
}

fn mask_json(mask: Mask) -> Value {
    match mask {
        Mask::Rect(r) => json!({ "rect": rect_json(r) }),
        Mask::RoundedRect(rr) => json!({
            "rounded_rect": rect_json(rr.rect()),
            "radii": [
                rr.radii().top_left,
                rr.radii().top_right,
                rr.radii().bottom_right,
                rr.radii().bottom_left,
            ],
        }),
    }
}

fn filter_json(filter: &Filter) -> Value {
    match filter {
        Filter::Blur(b) => json!({
            "blur": {
                "radius": b.radius,
                "seed": b.seed,
                "dither": b.dither,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::filter::BlurFilter;
    use arbor_core::node::{Content, SurfaceId};
    use arbor_core::transform::LocalTransform;

    fn sample() -> (DisplayTree, NodeId) {
        let mut tree = DisplayTree::new();
        let stage = tree.create_stage();
        let root = tree.stage_root(stage);
        let child = tree.create_node();
        tree.set_content(
            child,
            Some(Content {
                surface: SurfaceId(3),
                frame: Rect::new(0.0, 0.0, 8.0, 8.0),
            }),
        );
        tree.set_transform(child, LocalTransform::from_position(2.0, 0.0));
        tree.set_filters(root, vec![Filter::Blur(BlurFilter::new(4.0))]);
        tree.set_mask(root, Some(Mask::Rect(Rect::new(0.0, 0.0, 5.0, 5.0))));
        tree.add_child(root, child).unwrap();
        tree.update_transform(root);
        let _ = tree.bounds(root);
        (tree, root)
    }

    #[test]
    fn snapshot_nests_children() {
        let (tree, root) = sample();
        let v = snapshot(&tree, root);

        assert_eq!(v["id"], root.index());
        assert_eq!(v["stage"], 0);
        assert!(v["content"].is_null());
        assert_eq!(v["bounds"], json!([2.0, 0.0, 10.0, 8.0]));
        assert_eq!(v["filters"][0]["blur"]["radius"], 4.0);
        assert_eq!(v["mask"]["rect"], json!([0.0, 0.0, 5.0, 5.0]));

        let children = v["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["content"]["surface"], 3);
        assert_eq!(children[0]["world_transform"][4], 2.0);
        assert!(children[0]["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn write_snapshot_round_trips_through_json() {
        let (tree, root) = sample();
        let mut out = Vec::new();
        write_snapshot(&tree, root, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, snapshot(&tree, root));
    }
}
