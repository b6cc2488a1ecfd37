//! A retained scene of shapes that a chart draws into once and then mutates
//! only to show transient elements or to move the view.
//!
//! The `Surface` trait is the interface a chart needs from its output target.
//! `Scene` implements it in memory; it can be serialised to SVG or walked by
//! an interactive painter.

use crate::svg::{self, Params, Tag};

/// Handle to a node of a `Surface`. Handles of removed nodes stay invalid,
/// even after their storage is reused by a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// Translation followed by uniform scaling, the transform of pan and zoom.
///
/// A point `p` is mapped to `(x + k * p.x, y + k * p.y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self { k: 1.0, x, y }
    }

    pub fn apply(&self, px: f64, py: f64) -> (f64, f64) {
        (self.x + self.k * px, self.y + self.k * py)
    }

    pub fn invert_point(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.x) / self.k, (py - self.y) / self.k)
    }

    /// `self` applied after `inner`.
    pub fn then(&self, inner: &Transform) -> Transform {
        Transform {
            k: self.k * inner.k,
            x: self.x + self.k * inner.x,
            y: self.y + self.k * inner.y,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Value for an SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        if self.k == 1.0 {
            format!("translate({},{})", self.x, self.y)
        } else {
            format!("translate({},{}) scale({})", self.x, self.y, self.k)
        }
    }
}

/// Geometry of a node, in the coordinates of its parent group.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group(Transform),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    },
    /// Text anchored at its baseline point, rotated by `angle` degrees
    /// around it and shifted downwards by `dy` ems.
    Text {
        x: f64,
        y: f64,
        angle: f64,
        dy: f64,
        content: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

/// A shape together with its class and style, ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub class: Option<String>,
    pub style: Params,
}

impl Element {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            class: None,
            style: Params::new(),
        }
    }

    pub fn group(transform: Transform) -> Self {
        Self::new(Shape::Group(transform))
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(Shape::Circle { cx, cy, r })
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Shape::Rect {
            x,
            y,
            width,
            height,
            radius: 0.0,
        })
    }

    pub fn rounded_rect(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        Self::new(Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
        })
    }

    pub fn text(x: f64, y: f64, content: &str) -> Self {
        Self::new(Shape::Text {
            x,
            y,
            angle: 0.0,
            dy: 0.0,
            content: content.to_owned(),
        })
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Shape::Line { x1, y1, x2, y2 })
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_owned());
        self
    }

    pub fn with_style(mut self, key: &str, value: &str) -> Self {
        self.style.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_fill(self, color: &str) -> Self {
        self.with_style("fill", color)
    }

    /// Rotation of a text element in degrees. No effect on other shapes.
    pub fn with_angle(mut self, degrees: f64) -> Self {
        if let Shape::Text { angle, .. } = &mut self.shape {
            *angle = degrees;
        }
        self
    }

    /// Baseline shift of a text element in ems. No effect on other shapes.
    pub fn with_dy(mut self, ems: f64) -> Self {
        if let Shape::Text { dy, .. } = &mut self.shape {
            *dy = ems;
        }
        self
    }
}

/// The output target of a chart.
pub trait Surface {
    fn root(&self) -> NodeId;
    fn set_size(&mut self, width: f64, height: f64);
    /// Append `element` as the last child of `parent`.
    fn append(&mut self, parent: NodeId, element: Element) -> NodeId;
    /// Remove `node` and everything below it. Returns `false` and does
    /// nothing if the node is already gone or is the root.
    fn remove(&mut self, node: NodeId) -> bool;
    /// Replace the transform of a group node.
    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool;
    /// Report pointer enter and leave on `node` under `key`.
    fn listen(&mut self, node: NodeId, key: usize);
    /// Number of live nodes, the root included.
    fn node_count(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct Node {
    pub element: Element,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub listen_key: Option<usize>,
}

/// Storage for one node. `generation` is bumped each time the slot is freed.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// In-memory `Surface`.
///
/// Nodes live in slots; removed slots go onto a free list and are handed
/// out again by `append`, so showing and hiding the same subtree over and
/// over keeps the storage at a fixed size.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        let root = Node {
            element: Element::group(Transform::identity()),
            parent: None,
            children: Vec::new(),
            listen_key: None,
        };
        Self {
            width,
            height,
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            live: 1,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Number of allocated slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Empty the slot of `id` and put it on the free list.
    fn free_slot(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| &n.children[..]).unwrap_or(&[])
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(|id, node, _| {
            if node
                .element
                .class
                .as_deref()
                .is_some_and(|c| c.split_whitespace().any(|c| c == class))
            {
                found.push(id);
            }
        });
        found
    }

    /// Visit all live nodes in draw order. The transform handed to `f` maps
    /// the node's own coordinates to surface coordinates; for groups it
    /// already contains the group's transform.
    pub fn walk(&self, mut f: impl FnMut(NodeId, &Node, Transform)) {
        self.visit(self.root(), Transform::identity(), &mut f);
    }

    fn visit(
        &self,
        id: NodeId,
        parent_transform: Transform,
        f: &mut impl FnMut(NodeId, &Node, Transform),
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        let transform = match &node.element.shape {
            Shape::Group(t) => parent_transform.then(t),
            _ => parent_transform,
        };
        f(id, node, transform);
        for child in node.children.iter() {
            self.visit(*child, transform, f);
        }
    }

    /// The listening circle drawn last that contains the surface point
    /// `(x, y)`, with its listen key.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<(NodeId, usize)> {
        let mut hit = None;
        self.walk(|id, node, transform| {
            let (Some(key), Shape::Circle { cx, cy, r }) = (node.listen_key, &node.element.shape)
            else {
                return;
            };
            let (sx, sy) = transform.apply(*cx, *cy);
            let radius = r * transform.k;
            if (sx - x).hypot(sy - y) <= radius {
                hit = Some((id, key));
            }
        });
        hit
    }

    /// Render the scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut root = Tag::<svg::SVG>::new(self.width, self.height, None);
        root.add_children(
            self.children(self.root())
                .iter()
                .filter_map(|id| self.to_tag(*id))
                .collect(),
        );
        svg::render(&root)
    }

    fn to_tag(&self, id: NodeId) -> Option<Box<dyn svg::RenderTag>> {
        let node = self.node(id)?;
        let element = &node.element;
        let style = Some(element.style.clone());
        let tag: Box<dyn svg::RenderTag> = match &element.shape {
            Shape::Group(transform) => {
                let transform = (!transform.is_identity()).then(|| transform.to_svg());
                let mut tag = Tag::<svg::Group>::new(transform, style);
                if let Some(class) = &element.class {
                    tag.set_parameter("class", class);
                }
                tag.add_children(
                    node.children
                        .iter()
                        .filter_map(|child| self.to_tag(*child))
                        .collect(),
                );
                Box::new(tag)
            }
            Shape::Circle { cx, cy, r } => {
                let mut tag = Tag::<svg::Circle>::new(*cx, *cy, *r, style);
                set_class(&mut tag, element);
                Box::new(tag)
            }
            Shape::Rect {
                x,
                y,
                width,
                height,
                radius,
            } => {
                let mut tag = Tag::<svg::Rect>::new(*x, *y, *width, *height, style);
                if *radius > 0.0 {
                    tag.set_parameter("rx", &format!("{radius}"));
                    tag.set_parameter("ry", &format!("{radius}"));
                }
                set_class(&mut tag, element);
                Box::new(tag)
            }
            Shape::Text {
                x,
                y,
                angle,
                dy,
                content,
            } => {
                let mut tag = Tag::<svg::Text>::new(*x, *y, *angle, content, style);
                if *dy != 0.0 {
                    tag.set_parameter("dy", &format!("{dy}em"));
                }
                set_class(&mut tag, element);
                Box::new(tag)
            }
            Shape::Line { x1, y1, x2, y2 } => {
                let mut tag = Tag::<svg::Line>::new(*x1, *x2, *y1, *y2, style);
                set_class(&mut tag, element);
                Box::new(tag)
            }
        };
        Some(tag)
    }
}

fn set_class<T: std::fmt::Debug>(tag: &mut Tag<T>, element: &Element) {
    if let Some(class) = &element.class {
        tag.set_parameter("class", class);
    }
}

impl Surface for Scene {
    fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: 0,
        }
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let parent = if self.node(parent).is_some() {
            parent
        } else {
            log::warn!("parent {:?} does not exist, appending to root", parent);
            self.root()
        };
        let node = Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
            listen_key: None,
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.live += 1;
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn remove(&mut self, node: NodeId) -> bool {
        if node == self.root() {
            return false;
        }
        let Some(removed) = self.free_slot(node) else {
            return false;
        };
        if let Some(parent) = removed.parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != node);
        }
        let mut stack = removed.children;
        while let Some(child) = stack.pop() {
            if let Some(descendant) = self.free_slot(child) {
                stack.extend(descendant.children);
            }
        }
        true
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool {
        match self.node_mut(node).map(|n| &mut n.element.shape) {
            Some(Shape::Group(t)) => {
                *t = transform;
                true
            }
            _ => false,
        }
    }

    fn listen(&mut self, node: NodeId, key: usize) {
        if let Some(n) = self.node_mut(node) {
            n.listen_key = Some(key);
        }
    }

    fn node_count(&self) -> usize {
        self.live
    }
}
