//! The item tree builder: from ordered declaration events to a
//! resolved element tree.
//!
//! Build-time nodes live in an arena indexed by position, with parent
//! links as indices — the finished element tree carries no parent
//! back-references, so there are no ownership cycles to manage.
//!
//! Nesting follows a single rule: for a new node at level N, walk
//! upward from the most recently attached node until an ancestor with
//! a level strictly less than N (the document root is level 0); that
//! ancestor is the parent. Equal levels become siblings. Skipped
//! levels, non-monotonic sequences and repeated levels all resolve
//! under this rule alone.

use tracing::warn;

use crate::error::LayoutError;
use crate::settings::SignPosition;
use crate::types::{
    AlphaNumeric, Binary, Element, FloatPrecision, Floating, Group, Packed, Picture,
    PictureCategory, SignedSeparate, Zoned,
};

use super::events::{FieldEvent, SignClause, Usage};
use super::redefine::{Redefine, RedefineRegistry};

/// Largest digit count any storage format holds.
const MAX_DIGITS: u32 = 18;

/// A build-time node; consumed exactly once by the element factory.
struct ItemNode {
    name: String,
    level: u8,
    picture: Option<String>,
    usage: Option<Usage>,
    occurs: u32,
    sign: Option<SignClause>,
    redefines: Option<String>,
    values: Vec<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Single-owner builder over the event stream.
pub(crate) struct TreeBuilder {
    nodes: Vec<ItemNode>,
    cursor: usize,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        // Node 0 is the document root; its level 0 terminates every
        // parent walk.
        let document = ItemNode {
            name: String::new(),
            level: 0,
            picture: None,
            usage: None,
            occurs: 1,
            sign: None,
            redefines: None,
            values: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![document],
            cursor: 0,
        }
    }

    /// Attach one declaration event.
    pub(crate) fn push(&mut self, event: &FieldEvent) -> Result<(), LayoutError> {
        match event.level {
            1..=49 => {}
            66 | 77 | 88 => {
                warn!(field = %event.name, level = event.level, "unsupported level skipped");
                return Ok(());
            }
            other => {
                return Err(LayoutError::InvalidLevel {
                    field: event.name.clone(),
                    level: other,
                });
            }
        }
        if let Some(depending_on) = &event.depending_on {
            warn!(
                field = %event.name,
                depending_on = %depending_on,
                "OCCURS DEPENDING ON ignored; fixed count used"
            );
        }

        let mut candidate = self.cursor;
        while self.nodes[candidate].level >= event.level {
            candidate = self.nodes[candidate]
                .parent
                .expect("document root has level 0");
        }

        let index = self.nodes.len();
        self.nodes.push(ItemNode {
            name: event.name.clone(),
            level: event.level,
            picture: event.picture.clone(),
            usage: event.usage,
            occurs: event.occurs.max(1),
            sign: event.sign,
            redefines: event.redefines.clone(),
            values: event.values.clone(),
            parent: Some(candidate),
            children: Vec::new(),
        });
        self.nodes[candidate].children.push(index);
        self.cursor = index;
        Ok(())
    }

    /// Resolve every node into its element, depth-first, and hand back
    /// the document group and the redefine registry.
    pub(crate) fn finish(
        self,
        document_name: &str,
    ) -> Result<(Group, RedefineRegistry), LayoutError> {
        let mut registry = RedefineRegistry::default();
        let children = self.build_children(0, &mut registry)?;
        Ok((
            Group::new(document_name.to_string(), 0, 1, children),
            registry,
        ))
    }

    fn build_children(
        &self,
        index: usize,
        registry: &mut RedefineRegistry,
    ) -> Result<Vec<Element>, LayoutError> {
        let mut elements: Vec<Element> = Vec::with_capacity(self.nodes[index].children.len());
        for &child_index in &self.nodes[index].children {
            let child = &self.nodes[child_index];
            let element = self.build_element(child_index, registry)?;

            if let Some(target) = &child.redefines {
                // The target must already exist: an earlier sibling, or
                // an earlier alias for chained redefinitions.
                let known = elements
                    .iter()
                    .any(|e| e.name().eq_ignore_ascii_case(target))
                    || registry.lookup(target).is_some();
                if !known {
                    return Err(LayoutError::UnknownRedefinesTarget {
                        alias: child.name.clone(),
                        target: target.clone(),
                    });
                }
                // A redefinition is a view: it contributes nothing to
                // the parent's byte layout.
                registry.register(Redefine::new(
                    child.name.clone(),
                    target.clone(),
                    element,
                ));
            } else {
                elements.push(element);
            }
        }
        Ok(elements)
    }

    /// The element factory: exactly one variant per node.
    fn build_element(
        &self,
        index: usize,
        registry: &mut RedefineRegistry,
    ) -> Result<Element, LayoutError> {
        let node = &self.nodes[index];
        let name = node.name.clone();
        let unresolvable = |reason: &str| LayoutError::Unresolvable {
            field: node.name.clone(),
            reason: reason.to_string(),
        };

        let element = match &node.picture {
            None => match node.usage {
                Some(Usage::Comp1) => Element::Floating(Floating::new(
                    name,
                    node.level,
                    node.occurs,
                    FloatPrecision::Single,
                )),
                Some(Usage::Comp2) => Element::Floating(Floating::new(
                    name,
                    node.level,
                    node.occurs,
                    FloatPrecision::Double,
                )),
                None | Some(Usage::Display) => {
                    let children = self.build_children(index, registry)?;
                    Element::Group(Group::new(name, node.level, node.occurs, children))
                }
                Some(_) => return Err(unresolvable("numeric USAGE requires a PICTURE")),
            },
            Some(picture_str) => {
                if !node.children.is_empty() {
                    return Err(unresolvable("a group item cannot carry a PICTURE"));
                }
                let picture = Picture::parse(&node.name, picture_str)?;
                match picture.category() {
                    PictureCategory::Alphanumeric => match node.usage {
                        None | Some(Usage::Display) => Element::AlphaNumeric(AlphaNumeric::new(
                            name,
                            node.level,
                            node.occurs,
                            picture.char_count(),
                        )),
                        Some(_) => {
                            return Err(unresolvable(
                                "an alphanumeric PICTURE only supports USAGE DISPLAY",
                            ))
                        }
                    },
                    PictureCategory::Numeric => {
                        if picture.digits() > MAX_DIGITS {
                            return Err(LayoutError::TooManyDigits {
                                field: node.name.clone(),
                                digits: picture.digits(),
                                max: MAX_DIGITS,
                            });
                        }
                        let sign_position = node.sign.map(|s| {
                            if s.leading {
                                SignPosition::Leading
                            } else {
                                SignPosition::Trailing
                            }
                        });
                        match node.usage {
                            Some(Usage::Binary) => Element::Binary(Binary::new(
                                name,
                                node.level,
                                node.occurs,
                                picture.digits(),
                                picture.scale(),
                                picture.signed(),
                                false,
                            )),
                            Some(Usage::Comp5) => Element::Binary(Binary::new(
                                name,
                                node.level,
                                node.occurs,
                                picture.digits(),
                                picture.scale(),
                                picture.signed(),
                                true,
                            )),
                            Some(Usage::PackedDecimal) => Element::Packed(Packed::new(
                                name,
                                node.level,
                                node.occurs,
                                picture.digits(),
                                picture.scale(),
                                picture.signed(),
                            )),
                            Some(Usage::Comp1) | Some(Usage::Comp2) => {
                                return Err(unresolvable(
                                    "floating USAGE cannot carry a PICTURE",
                                ))
                            }
                            None | Some(Usage::Display) => {
                                if node.sign.is_some_and(|s| s.separate) {
                                    if !picture.signed() {
                                        return Err(unresolvable(
                                            "SIGN SEPARATE requires a signed PICTURE",
                                        ));
                                    }
                                    Element::SignedSeparate(SignedSeparate::new(
                                        name,
                                        node.level,
                                        node.occurs,
                                        picture.digits(),
                                        picture.scale(),
                                        sign_position,
                                    ))
                                } else {
                                    Element::Zoned(Zoned::new(
                                        name,
                                        node.level,
                                        node.occurs,
                                        picture.digits(),
                                        picture.scale(),
                                        picture.signed(),
                                        sign_position,
                                    ))
                                }
                            }
                        }
                    }
                }
            }
        };

        Ok(attach_literals(element, &node.values))
    }
}

fn attach_literals(mut element: Element, values: &[String]) -> Element {
    if values.is_empty() {
        return element;
    }
    match &mut element {
        Element::AlphaNumeric(e) => e.literals = values.to_vec(),
        Element::Binary(e) => e.literals = values.to_vec(),
        Element::Packed(e) => e.literals = values.to_vec(),
        Element::Zoned(e) => e.literals = values.to_vec(),
        Element::SignedSeparate(e) => e.literals = values.to_vec(),
        Element::Floating(e) => e.literals = values.to_vec(),
        Element::Group(_) => {}
    }
    element
}
