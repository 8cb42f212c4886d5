//! Integration tests for the Axis and Flex containers.

mod common;

use std::convert::Infallible;

use common::{FakeImage, MonoBackend, compute, compute_dim, tlbr};
use pillar_common::warning::was_warned;
use pillar_layout::{
    Axis, Dim, Direction, EmptyBox, Extent, Flex, GeometryNode, GeometryOnly, ImageRenderable,
    Instruction, InstructionList, LayoutContext, LayoutError, LengthUnit, Node, TracePath, Unit,
};

fn solid_box() -> GeometryNode {
    EmptyBox::square(1.0).with_spacer(false).into()
}

fn spacer_box() -> GeometryNode {
    EmptyBox::square(1.0).into()
}

fn pair(direction: Direction) -> GeometryNode {
    Axis::new(direction, vec![solid_box(), solid_box()]).into()
}

fn flex_of_three(expand: Vec<bool>) -> Flex<Infallible> {
    Flex::new(
        Direction::Vertical,
        vec![spacer_box(), spacer_box(), spacer_box()],
        expand,
    )
}

#[test]
fn test_axis_exact_fit() {
    assert_eq!(
        compute(&pair(Direction::Horizontal), 2.0, 1.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(0.0, 1.0, 1.0, 2.0)]
    );
}

#[test]
fn test_axis_cross_axis_shrink_spreads_space() {
    assert_eq!(
        compute(&pair(Direction::Horizontal), 2.0, 0.5),
        vec![tlbr(0.0, 0.0, 0.5, 0.5), tlbr(0.0, 1.5, 0.5, 2.0)]
    );
}

#[test]
fn test_axis_boxes_do_not_enlarge() {
    assert_eq!(
        compute(&pair(Direction::Horizontal), 2.0, 2.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(0.0, 1.0, 1.0, 2.0)]
    );
    assert_eq!(
        compute(&pair(Direction::Horizontal), 3.0, 2.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(0.0, 2.0, 1.0, 3.0)]
    );
}

#[test]
fn test_axis_vertical() {
    let layout = pair(Direction::Vertical);
    assert_eq!(
        compute(&layout, 1.0, 2.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(1.0, 0.0, 2.0, 1.0)]
    );
    assert_eq!(
        compute(&layout, 0.5, 2.0),
        vec![tlbr(0.0, 0.0, 0.5, 0.5), tlbr(1.5, 0.0, 2.0, 0.5)]
    );
    assert_eq!(
        compute(&layout, 1.0, 3.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(2.0, 0.0, 3.0, 1.0)]
    );
}

#[test]
fn test_axis_main_axis_shrink() {
    assert_eq!(
        compute(&pair(Direction::Vertical), 1.0, 1.5),
        vec![tlbr(0.0, 0.0, 0.75, 0.75), tlbr(0.75, 0.0, 1.5, 0.75)]
    );
}

#[test]
fn test_axis_leaves_spacers_alone() {
    let layout: GeometryNode =
        Axis::new(Direction::Horizontal, vec![solid_box(), spacer_box()]).into();
    assert_eq!(
        compute(&layout, 1.5, 1.0),
        vec![tlbr(0.0, 0.0, 0.5, 0.5), tlbr(0.0, 0.5, 1.0, 1.5)]
    );
}

#[test]
fn test_axis_overlaps_when_nothing_shrinks() {
    let layout: GeometryNode =
        Axis::new(Direction::Horizontal, vec![spacer_box(), spacer_box()]).into();
    assert_eq!(
        compute(&layout, 1.5, 1.0),
        vec![tlbr(0.0, 0.0, 1.0, 1.0), tlbr(0.0, 0.5, 1.0, 1.5)]
    );
    assert!(was_warned(
        "layout",
        "children (2in) overflow the axis (1.5in) with nothing to shrink; they will overlap"
    ));
}

#[test]
fn test_axis_single_child_untouched() {
    let layout: GeometryNode = Axis::new(Direction::Horizontal, vec![solid_box()]).into();
    assert_eq!(compute(&layout, 4.0, 1.0), vec![tlbr(0.0, 0.0, 1.0, 1.0)]);
    let empty: GeometryNode = Axis::new(Direction::Horizontal, vec![]).into();
    assert!(compute(&empty, 4.0, 1.0).is_empty());
}

#[test]
fn test_axis_unconstrained_main_axis_abuts() {
    let constraint = Dim::new(Extent::Unconstrained, Unit::inches(0.5));
    assert_eq!(
        compute_dim(&pair(Direction::Horizontal), &constraint),
        vec![tlbr(0.0, 0.0, 0.5, 0.5), tlbr(0.0, 0.5, 0.5, 1.0)]
    );
}

#[test]
fn test_axis_force_expand_grows_shrinkable_children() {
    let layout: GeometryNode = Axis::new(Direction::Horizontal, vec![solid_box(), solid_box()])
        .with_expand(true)
        .into();
    // children fit at 1x1 and are rescaled by 4 / 2 to fill the axis
    assert_eq!(
        compute(&layout, 4.0, 1.0),
        vec![tlbr(0.0, 0.0, 2.0, 2.0), tlbr(0.0, 2.0, 2.0, 4.0)]
    );
}

#[test]
fn test_axis_unit_mismatch_is_structural() {
    let layout: GeometryNode = Axis::new(
        Direction::Horizontal,
        vec![EmptyBox::new(Unit::pixels(10.0), Unit::pixels(10.0)).into()],
    )
    .into();
    let err = layout
        .compute(&Dim::inches(1.0, 1.0), &LayoutContext::new(&GeometryOnly, 1.0))
        .unwrap_err();
    assert!(matches!(err, LayoutError::UnitMismatch { .. }));
    assert!(err.is_structural());
}

type Slots = Vec<Vec<Instruction<Infallible>>>;

fn render_flex(flex: &Flex<Infallible>, width: f64, height: f64) -> (Dim, Slots) {
    let (area, lists) = flex
        .render_flex(
            &Dim::inches(width, height),
            &LayoutContext::new(&GeometryOnly, 1.0),
            &TracePath::root("Flex"),
        )
        .unwrap();
    (area, lists.into_iter().map(InstructionList::into_vec).collect())
}

#[test]
fn test_flex_exact_fit() {
    let (area, lists) = render_flex(&flex_of_three(vec![false, true, false]), 1.0, 3.0);
    assert_eq!(area, Dim::inches(1.0, 1.0));
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[1][0], tlbr(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn test_flex_extra_space() {
    let (area, lists) = render_flex(&flex_of_three(vec![false, true, false]), 1.0, 4.0);
    assert_eq!(area, Dim::inches(1.0, 2.0));
    assert_eq!(lists[1][0], tlbr(0.0, 0.0, 1.0, 1.0));
    // the slot marker reports the whole flex area
    assert_eq!(lists[1][1], tlbr(0.0, 0.0, 2.0, 1.0));
}

#[test]
fn test_flex_less_space() {
    let (area, lists) = render_flex(&flex_of_three(vec![false, true, false]), 1.0, 2.5);
    assert_eq!(area, Dim::inches(1.0, 0.5));
    assert_eq!(lists[1][0], tlbr(0.0, 0.0, 0.5, 0.5));
}

#[test]
fn test_flex_shrunk_cross_axis() {
    let (area, lists) = render_flex(&flex_of_three(vec![false, true, false]), 0.5, 2.0);
    assert_eq!(area, Dim::inches(0.5, 1.0));
    assert_eq!(lists[1][0], tlbr(0.0, 0.0, 0.5, 0.5));
}

#[test]
fn test_flex_compute_places_slots() {
    let layout: GeometryNode = flex_of_three(vec![false, true, false]).into();
    assert_eq!(
        compute(&layout, 1.0, 4.0),
        vec![
            tlbr(0.0, 0.0, 1.0, 1.0),
            tlbr(1.0, 0.0, 2.0, 1.0),
            tlbr(1.0, 0.0, 3.0, 1.0),
            tlbr(3.0, 0.0, 4.0, 1.0),
        ]
    );
}

#[test]
fn test_flex_with_expanding_builds_markers() {
    let flex = Flex::with_expanding(
        Direction::Vertical,
        vec![spacer_box(), spacer_box(), spacer_box()],
        2,
    );
    assert_eq!(flex.expand, vec![false, false, true]);
}

#[test]
fn test_flex_marker_errors() {
    let cx = LayoutContext::new(&GeometryOnly, 1.0);
    let dim = Dim::inches(1.0, 3.0);

    let none: GeometryNode = flex_of_three(vec![false, false, false]).into();
    assert_eq!(none.compute(&dim, &cx).unwrap_err(), LayoutError::ExpandCount(0));

    let two: GeometryNode = flex_of_three(vec![true, true, false]).into();
    assert_eq!(two.compute(&dim, &cx).unwrap_err(), LayoutError::ExpandCount(2));

    let short: GeometryNode = flex_of_three(vec![true, false]).into();
    assert_eq!(
        short.compute(&dim, &cx).unwrap_err(),
        LayoutError::ExpandLength {
            markers: 2,
            children: 3,
        }
    );
}

#[test]
fn test_flex_needs_main_axis() {
    let layout: GeometryNode = flex_of_three(vec![false, true, false]).into();
    let err = layout
        .compute(
            &Dim::new(Unit::inches(1.0), Extent::Unconstrained),
            &LayoutContext::new(&GeometryOnly, 1.0),
        )
        .unwrap_err();
    assert!(matches!(err, LayoutError::Unconstrained(_)));
}

#[test]
fn test_flex_negative_remainder_still_lays_out() {
    let layout: GeometryNode = flex_of_three(vec![false, true, false]).into();
    let placed = compute(&layout, 1.0, 1.5);
    assert_eq!(placed.len(), 4);
    assert!(was_warned(
        "layout",
        "flex remainder -0.5in is negative; children will overlap"
    ));
}

fn photo(tag: &'static str) -> Node<FakeImage> {
    ImageRenderable::new(FakeImage::new(100, 100, tag)).into()
}

#[test]
fn test_axis_in_pixels_with_unconstrained_cross_axis() {
    let backend = MonoBackend::default();
    let cx = LayoutContext::new(&backend, 100.0);
    let layout: Node<FakeImage> =
        Axis::new(Direction::Horizontal, vec![photo("a"), photo("b")]).into();
    let placed = layout
        .compute(&Dim::new(Unit::pixels(150.0), Extent::Unconstrained), &cx)
        .unwrap();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].size().unwrap(), Dim::pixels(75.0, 75.0));
    assert_eq!(placed[1].left, Unit::pixels(75.0));
    assert_eq!(placed[1].right, Unit::pixels(150.0));
    assert_eq!(placed[1].right.unit(), Some(LengthUnit::Pixel));
}

#[test]
fn test_flex_in_pixels_with_unconstrained_cross_axis() {
    let backend = MonoBackend::default();
    let cx = LayoutContext::new(&backend, 100.0);
    let layout: Node<FakeImage> =
        Flex::with_expanding(Direction::Horizontal, vec![photo("a"), photo("b")], 1).into();
    let placed = layout
        .compute(&Dim::new(Unit::pixels(300.0), Extent::Unconstrained), &cx)
        .unwrap();
    assert_eq!(placed.len(), 3);
    assert_eq!(placed[0].size().unwrap(), Dim::pixels(100.0, 100.0));
    assert_eq!(placed[1].size().unwrap(), Dim::pixels(200.0, 200.0));
    assert_eq!(placed[2].right, Unit::pixels(300.0));
}

#[test]
fn test_default_unit_applies_to_fully_unconstrained_leaves() {
    let backend = MonoBackend::default();
    let cx = LayoutContext::new(&backend, 100.0).with_default_unit(LengthUnit::Pixel);
    let placed = photo("a").compute(&Dim::unconstrained(), &cx).unwrap();
    assert_eq!(placed[0].size().unwrap(), Dim::pixels(100.0, 100.0));
}
