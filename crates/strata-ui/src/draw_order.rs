//! Back-to-front flattening of a frame for rendering.

use strata_core::geometry::Rect;
use strata_core::math::Vec2;
use strata_core::profiling::profile_function;

use crate::component::{ComponentId, ComponentTree};
use crate::frame::{FrameId, Frames};
use crate::layer::LayerId;

/// One component to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub layer: LayerId,
    pub component: ComponentId,
    /// Bounds in frame coordinates.
    pub bounds: Rect,
    /// Distance from the layer's root container.
    pub depth: u32,
}

/// Every visible component of `frame`, back to front, parents before
/// children. Root containers are drawn with the frame's size.
pub fn draw_order(tree: &ComponentTree, frames: &Frames, frame: FrameId) -> Vec<DrawItem> {
    profile_function!();
    let Some(size) = frames.frame(frame).map(|f| f.size()) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for layer in frames.all_layers(frame) {
        let Some(root) = frames.layer_container(layer) else {
            continue;
        };
        let Some(container) = tree.get(root) else {
            continue;
        };
        if !container.visible {
            continue;
        }
        let origin = container.bounds.position();
        items.push(DrawItem {
            layer,
            component: root,
            bounds: Rect::from_position_size(origin, size),
            depth: 0,
        });

        // Reverse-pushed stack yields children in paint order.
        let mut stack: Vec<(ComponentId, Vec2, u32)> = container
            .children()
            .iter()
            .rev()
            .map(|&child| (child, origin, 1))
            .collect();
        while let Some((node, offset, depth)) = stack.pop() {
            let Some(component) = tree.get(node) else {
                continue;
            };
            if !component.visible {
                continue;
            }
            let bounds = component.bounds.offset(offset);
            items.push(DrawItem {
                layer,
                component: node,
                bounds,
                depth,
            });
            stack.extend(
                component
                    .children()
                    .iter()
                    .rev()
                    .map(|&child| (child, bounds.position(), depth + 1)),
            );
        }
    }
    items
}
