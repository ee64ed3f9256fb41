use crate::config::ViewportConfig;
use crate::geom::{Extent, Grid, Point};
use crate::graph::GraphModel;

/// The uniform transform [`fit_to_viewport`] applied to the solver output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub scale: f64,
    /// Where the layout's top-left corner landed.
    pub origin: Point,
}

impl ViewportFit {
    /// A grid of `size` solver units expressed in canvas units, anchored at the layout corner.
    pub fn grid(&self, size: f64) -> Grid {
        Grid {
            size: size * self.scale,
            origin: self.origin,
        }
    }
}

/// Moves the layout's top-left corner to `margin` and shrinks it uniformly when it does not fit
/// inside `max_width × max_height`. Layouts are never enlarged.
///
/// Non-finite or non-positive limits do not constrain the scale. The margin shrinks on canvases
/// narrower than two margins, and the scale never drops below `min_scale`.
pub fn fit_to_viewport(
    graph: &mut GraphModel,
    max_width: f64,
    max_height: f64,
    cfg: &ViewportConfig,
) -> ViewportFit {
    let mut margin = if cfg.margin.is_finite() {
        cfg.margin.max(0.0)
    } else {
        0.0
    };
    for limit in [max_width, max_height] {
        if usable(limit) {
            margin = margin.min(limit / 2.0);
        }
    }
    let origin = Point::new(margin, margin);

    let Some(extent) = Extent::from_points(graph.nodes.iter().map(|n| n.position)) else {
        return ViewportFit { scale: 1.0, origin };
    };
    let avail = |limit: f64| usable(limit).then(|| limit - 2.0 * margin);
    let scale = fit_scale(extent, avail(max_width), avail(max_height), cfg.min_scale);

    for n in &mut graph.nodes {
        n.position = Point::new(
            margin + (n.position.x - extent.min_x) * scale,
            margin + (n.position.y - extent.min_y) * scale,
        );
    }

    tracing::debug!(
        scale,
        margin,
        width = extent.width(),
        height = extent.height(),
        "fitted layout to viewport"
    );

    ViewportFit { scale, origin }
}

fn usable(limit: f64) -> bool {
    limit.is_finite() && limit > 0.0
}

fn fit_scale(extent: Extent, avail_w: Option<f64>, avail_h: Option<f64>, min_scale: f64) -> f64 {
    let mut scale: f64 = 1.0;
    for (size, avail) in [(extent.width(), avail_w), (extent.height(), avail_h)] {
        if let Some(avail) = avail {
            if size > avail {
                scale = scale.min(avail / size);
            }
        }
    }
    if min_scale.is_finite() && min_scale > 0.0 {
        scale = scale.max(min_scale.min(1.0));
    }
    scale
}
