//! Fixed-geometry layout of the 100mm x 100mm label.
//!
//! All coordinates are CSS px (96 px per inch). Regions are laid out top to
//! bottom inside a bordered box, with the tracking number repeated in a 12px
//! trim strip on every edge. Nothing in a record can move or grow a region:
//! single-line fields are truncated with an ellipsis and the recipient address
//! is clamped to three lines.

use crate::model::LabelRecord;
use crate::rendering::paint::Color;
use crate::rendering::text::{truncate_to_width, wrap_clamped, Case, TextStyle, Weight, ELLIPSIS};
use crate::symbols::{BarcodeImage, EncodedSymbols, QrImage};
use crate::{CashlessBanner, RenderConfig};

pub const PX_PER_MM: f32 = 96.0 / 25.4;
pub const LABEL_SIZE_MM: f32 = 100.0;

const TRIM: f32 = 12.0;
const TRIM_INSET: f32 = 48.0;
const TRIM_REPEAT: usize = 3;
const MAIN_BORDER: f32 = 1.8;
const BOX_STROKE: f32 = 1.5;
const GAP: f32 = 4.0;
const HEADER_H: f32 = 30.0;
const DIVIDER: f32 = 1.5;
const ROUTING_H: f32 = 85.0;
const HUB_ROW_H: f32 = 32.0;
const TAG_ROW_H: f32 = 24.0;
const BANNER_H: f32 = 24.0;
const FOOTER_H: f32 = 75.0;
const RECIPIENT_SHARE: f32 = 0.58;
const QR_SHARE: f32 = 0.2;
const ADDRESS_MAX_LINES: usize = 3;
const ADDRESS_LINE_H: f32 = 8.5 * 1.1;
const META_PAIR_GAP: f32 = 12.0;

pub const BRAND_NAME: &str = "Shopee";
pub const EXPRESS_MARK: &str = "SPX";
pub const EXPRESS_BADGE: &str = "EXPRESS";
pub const RESI_CAPTION: &str = "No. Resi:";
pub const CASHLESS_TITLE: &str = "CASHLESS";
pub const CASHLESS_NOTE: &str = "Penjual tidak perlu bayar ongkir ke Kurir";
pub const COD_LABEL: &str = "COD Cek Dulu:";
const COD_LABEL_MIN: &str = "COD";

/// Edge length of the label in CSS px
pub fn label_size_px() -> f32 {
    LABEL_SIZE_MM * PX_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn inset(&self, d: f32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.width - 2.0 * d, self.height - 2.0 * d)
    }

    /// Whether `other` lies inside this rect (with a small tolerance for
    /// float rounding)
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Every region on the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Background,
    TrimTop,
    TrimBottom,
    TrimLeft,
    TrimRight,
    MainBorder,
    BrandMark,
    ServiceType,
    ExpressMark,
    DividerTop,
    MainCode,
    HubSubCode,
    ResiText,
    Barcode,
    DividerBottom,
    Watermark,
    Recipient,
    RecipientPhone,
    RecipientAddress,
    Sender,
    District,
    SubDistrict,
    Village,
    CashlessBanner,
    FooterMeta,
    QrCode,
}

impl RegionId {
    pub fn name(self) -> &'static str {
        match self {
            RegionId::Background => "background",
            RegionId::TrimTop => "trim-top",
            RegionId::TrimBottom => "trim-bottom",
            RegionId::TrimLeft => "trim-left",
            RegionId::TrimRight => "trim-right",
            RegionId::MainBorder => "main-border",
            RegionId::BrandMark => "brand-mark",
            RegionId::ServiceType => "service-type",
            RegionId::ExpressMark => "express-mark",
            RegionId::DividerTop => "divider-top",
            RegionId::MainCode => "main-code",
            RegionId::HubSubCode => "hub-sub-code",
            RegionId::ResiText => "resi-text",
            RegionId::Barcode => "barcode",
            RegionId::DividerBottom => "divider-bottom",
            RegionId::Watermark => "watermark",
            RegionId::Recipient => "recipient",
            RegionId::RecipientPhone => "recipient-phone",
            RegionId::RecipientAddress => "recipient-address",
            RegionId::Sender => "sender",
            RegionId::District => "district",
            RegionId::SubDistrict => "sub-district",
            RegionId::Village => "village",
            RegionId::CashlessBanner => "cashless-banner",
            RegionId::FooterMeta => "footer-meta",
            RegionId::QrCode => "qr-code",
        }
    }
}

/// Paint order; later layers cover earlier ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Watermark,
    Content,
    Trim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// One line of text, positioned by its anchor point and vertical centre
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub style: TextStyle,
    pub anchor: Anchor,
    pub color: Color,
    /// Rotation in degrees around (x, y)
    pub rotate: f32,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            style,
            anchor: Anchor::Start,
            color: Color::BLACK,
            rotate: 0.0,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    /// Estimated box covered by the run after rotation
    pub fn extent(&self) -> Rect {
        let w = self.style.measure(&self.text);
        let h = self.style.size;
        let start = match self.anchor {
            Anchor::Start => 0.0,
            Anchor::Middle => -w / 2.0,
            Anchor::End => -w,
        };
        if (self.rotate.abs() - 90.0).abs() < f32::EPSILON {
            // -90 turns the run to read bottom-to-top around its anchor
            let sign = -self.rotate.signum();
            let (a, b) = (self.y - sign * start, self.y - sign * (start + w));
            Rect::new(self.x - h / 2.0, a.min(b), h, w)
        } else {
            Rect::new(self.x + start, self.y - h / 2.0, w, h)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Fill { color: Color, radius: f32 },
    /// Border drawn inside the node rect
    Frame { stroke: f32 },
    /// A line filling the node rect along its longer side
    Rule { dotted: bool },
    Text(Vec<TextRun>),
    Barcode(BarcodeImage),
    Qr(QrImage),
    /// A symbol slot with nothing to draw
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub region: RegionId,
    pub rect: Rect,
    pub layer: Layer,
    pub opacity: f32,
    /// Overflow is hidden outside this rect
    pub clip: Option<Rect>,
    pub content: NodeContent,
}

/// The visual tree of one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<LayoutNode>,
}

impl LabelLayout {
    pub fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn nodes_for(&self, region: RegionId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |n| n.region == region)
    }

    /// Text of every run in `region`, in layout order
    pub fn text_lines(&self, region: RegionId) -> Vec<&str> {
        self.nodes_for(region)
            .filter_map(|n| match &n.content {
                NodeContent::Text(runs) => Some(runs),
                _ => None,
            })
            .flatten()
            .map(|r| r.text.as_str())
            .collect()
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<LayoutNode>,
}

impl Builder {
    fn push(&mut self, region: RegionId, rect: Rect, layer: Layer, content: NodeContent) {
        self.nodes.push(LayoutNode {
            region,
            rect,
            layer,
            opacity: 1.0,
            clip: None,
            content,
        });
    }

    fn frame(&mut self, region: RegionId, rect: Rect, stroke: f32) {
        self.push(region, rect, Layer::Content, NodeContent::Frame { stroke });
    }

    fn rule(&mut self, region: RegionId, rect: Rect, dotted: bool) {
        self.push(region, rect, Layer::Content, NodeContent::Rule { dotted });
    }

    fn text(&mut self, region: RegionId, rect: Rect, runs: Vec<TextRun>) {
        self.text_on(region, rect, Layer::Content, runs);
    }

    fn text_on(&mut self, region: RegionId, rect: Rect, layer: Layer, runs: Vec<TextRun>) {
        self.nodes.push(LayoutNode {
            region,
            rect,
            layer,
            opacity: 1.0,
            clip: Some(rect),
            content: NodeContent::Text(runs),
        });
    }
}

fn fit(text: &str, case: Case, style: &TextStyle, width: f32) -> String {
    truncate_to_width(&case.apply(text), style, width)
}

/// Lay out `record` with whichever symbols are current for it.
pub fn layout_label(record: &LabelRecord, symbols: &EncodedSymbols, config: &RenderConfig) -> LabelLayout {
    let size = label_size_px();
    let canvas = Rect::new(0.0, 0.0, size, size);
    let mut b = Builder::default();

    b.push(
        RegionId::Background,
        canvas,
        Layer::Background,
        NodeContent::Fill {
            color: Color::WHITE,
            radius: 0.0,
        },
    );
    trim_strips(&mut b, &record.resi_number, canvas);

    let outer = canvas.inset(TRIM);
    b.frame(RegionId::MainBorder, outer, MAIN_BORDER);
    let inner = outer.inset(MAIN_BORDER);

    let mut y = inner.y;
    header(&mut b, record, Rect::new(inner.x, y, inner.width, HEADER_H));
    y += HEADER_H;
    b.rule(
        RegionId::DividerTop,
        Rect::new(inner.x + GAP, y, inner.width - 2.0 * GAP, DIVIDER),
        true,
    );
    y += DIVIDER + GAP;

    routing(
        &mut b,
        record,
        symbols,
        Rect::new(inner.x + GAP, y, inner.width - 2.0 * GAP, ROUTING_H),
    );
    y += ROUTING_H + 2.0;
    b.rule(
        RegionId::DividerBottom,
        Rect::new(inner.x + GAP, y, inner.width - 2.0 * GAP, DIVIDER),
        true,
    );
    y += DIVIDER;

    // the address row takes whatever the fixed rows below leave
    let below = 2.0 + TAG_ROW_H + GAP + BANNER_H + 2.0 + FOOTER_H;
    let address_h = inner.bottom() - below - y;
    address(&mut b, record, Rect::new(inner.x, y, inner.width, address_h));
    y += address_h + 2.0;

    location_tags(
        &mut b,
        record,
        Rect::new(inner.x + GAP, y, inner.width - 2.0 * GAP, TAG_ROW_H),
    );
    y += TAG_ROW_H + GAP;

    cashless_banner(
        &mut b,
        record,
        Rect::new(inner.x, y, inner.width, BANNER_H),
        config.cashless_banner,
    );
    y += BANNER_H + 2.0;

    footer(&mut b, record, symbols, Rect::new(inner.x, y, inner.width, FOOTER_H));

    // overflow of the bordered box is hidden
    for node in b.nodes.iter_mut() {
        if node.layer == Layer::Content && node.clip.is_none() && node.region != RegionId::MainBorder {
            node.clip = Some(inner);
        }
    }

    LabelLayout {
        width: size,
        height: size,
        nodes: b.nodes,
    }
}

/// Centres of the repeated trim texts along a strip
fn trim_centres(start: f32, span: f32, item: f32) -> Vec<f32> {
    let n = TRIM_REPEAT as f32;
    if item * n <= span {
        let gap = (span - item * n) / (n - 1.0);
        (0..TRIM_REPEAT)
            .map(|i| start + item / 2.0 + i as f32 * (item + gap))
            .collect()
    } else {
        (0..TRIM_REPEAT)
            .map(|i| start + item * (i as f32 + 0.5))
            .collect()
    }
}

fn trim_strips(b: &mut Builder, resi: &str, canvas: Rect) {
    let style = TextStyle::new(6.0, Weight::Bold);
    let strips = [
        (RegionId::TrimTop, Rect::new(0.0, 0.0, canvas.width, TRIM), false),
        (
            RegionId::TrimBottom,
            Rect::new(0.0, canvas.bottom() - TRIM, canvas.width, TRIM),
            false,
        ),
        (RegionId::TrimLeft, Rect::new(0.0, 0.0, TRIM, canvas.height), true),
        (
            RegionId::TrimRight,
            Rect::new(canvas.right() - TRIM, 0.0, TRIM, canvas.height),
            true,
        ),
    ];

    for (region, rect, vertical) in strips {
        b.push(
            region,
            rect,
            Layer::Trim,
            NodeContent::Fill {
                color: Color::WHITE,
                radius: 0.0,
            },
        );
        if resi.is_empty() {
            continue;
        }
        let (start, span) = if vertical {
            (rect.y + TRIM_INSET, rect.height - 2.0 * TRIM_INSET)
        } else {
            (rect.x + TRIM_INSET, rect.width - 2.0 * TRIM_INSET)
        };
        let text = truncate_to_width(resi, &style, span / TRIM_REPEAT as f32);
        let item = style.measure(&text);
        let runs = trim_centres(start, span, item)
            .into_iter()
            .map(|c| {
                if vertical {
                    TextRun::new(text.clone(), rect.center_x(), c, style)
                        .anchor(Anchor::Middle)
                        .rotated(-90.0)
                } else {
                    TextRun::new(text.clone(), c, rect.center_y(), style).anchor(Anchor::Middle)
                }
            })
            .collect();
        b.text_on(region, rect, Layer::Trim, runs);
    }
}

fn header(b: &mut Builder, record: &LabelRecord, row: Rect) {
    let cy = row.center_y();

    let mark = Rect::new(row.x + 8.0, cy - 9.0, 18.0, 18.0);
    b.push(
        RegionId::BrandMark,
        mark,
        Layer::Content,
        NodeContent::Fill {
            color: Color::BRAND,
            radius: 2.0,
        },
    );
    let brand = TextStyle::new(16.0, Weight::Black).tracking(-0.05);
    let brand_x = mark.right() + 4.0;
    b.text(
        RegionId::BrandMark,
        Rect::new(brand_x, row.y, brand.measure(BRAND_NAME), row.height),
        vec![TextRun::new(BRAND_NAME, brand_x, cy, brand).color(Color::BRAND)],
    );

    let service = TextStyle::new(24.0, Weight::Black).tracking(-0.025);
    let service_w = row.width * 0.3;
    b.text(
        RegionId::ServiceType,
        Rect::new(row.center_x() - service_w / 2.0, row.y, service_w, row.height),
        vec![TextRun::new(
            fit(&record.service_type, Case::AsGiven, &service, service_w),
            row.center_x(),
            cy,
            service,
        )
        .anchor(Anchor::Middle)],
    );

    let right = row.right() - 8.0;
    let spx = TextStyle::new(26.0, Weight::Black).italic().tracking(-0.05);
    let badge_style = TextStyle::new(4.0, Weight::Black).tracking(0.2);
    let badge_w = badge_style.measure(EXPRESS_BADGE) + 8.0;
    let mark_w = spx.measure(EXPRESS_MARK).max(badge_w);
    b.text(
        RegionId::ExpressMark,
        Rect::new(right - mark_w, row.y, mark_w, row.height),
        vec![TextRun::new(EXPRESS_MARK, right, row.y + 13.0, spx)
            .anchor(Anchor::End)
            .color(Color::EXPRESS)],
    );
    let badge = Rect::new(right - badge_w, row.y + 21.0, badge_w, 7.0);
    b.push(
        RegionId::ExpressMark,
        badge,
        Layer::Content,
        NodeContent::Fill {
            color: Color::EXPRESS,
            radius: 0.0,
        },
    );
    b.text(
        RegionId::ExpressMark,
        badge,
        vec![
            TextRun::new(EXPRESS_BADGE, badge.center_x(), badge.center_y(), badge_style)
                .anchor(Anchor::Middle)
                .color(Color::WHITE),
        ],
    );
}

fn routing(b: &mut Builder, record: &LabelRecord, symbols: &EncodedSymbols, row: Rect) {
    let main_w = (row.width - GAP) * 0.36;
    let main_box = Rect::new(row.x, row.y, main_w, row.height);
    b.frame(RegionId::MainCode, main_box, BOX_STROKE);
    let main = TextStyle::new(32.0, Weight::Black).tracking(-0.05);
    let main_inner = main_box.inset(BOX_STROKE);
    b.text(
        RegionId::MainCode,
        main_inner,
        vec![TextRun::new(
            fit(&record.main_code, Case::AsGiven, &main, main_inner.width - 4.0),
            main_box.center_x(),
            main_box.center_y(),
            main,
        )
        .anchor(Anchor::Middle)],
    );

    let col = Rect::new(main_box.right() + GAP, row.y, row.width - main_w - GAP, row.height);
    let hub_w = (col.width - GAP) * 0.36;

    let hub_box = Rect::new(col.x, col.y, hub_w, HUB_ROW_H);
    b.frame(RegionId::HubSubCode, hub_box, BOX_STROKE);
    let hub = TextStyle::new(9.0, Weight::Black);
    let hub_inner = hub_box.inset(BOX_STROKE);
    b.text(
        RegionId::HubSubCode,
        hub_inner,
        vec![TextRun::new(
            fit(&record.hub_sub_code, Case::Upper, &hub, hub_inner.width - 4.0),
            hub_box.center_x(),
            hub_box.center_y(),
            hub,
        )
        .anchor(Anchor::Middle)],
    );

    let resi_box = Rect::new(hub_box.right() + GAP, col.y, col.width - hub_w - GAP, HUB_ROW_H);
    b.frame(RegionId::ResiText, resi_box, BOX_STROKE);
    let caption = TextStyle::new(7.0, Weight::Bold);
    let resi = TextStyle::new(11.0, Weight::Black).tracking(-0.025);
    let resi_inner = resi_box.inset(BOX_STROKE);
    b.text(
        RegionId::ResiText,
        resi_inner,
        vec![
            TextRun::new(
                Case::Upper.apply(RESI_CAPTION),
                resi_box.center_x(),
                resi_box.y + 9.0,
                caption,
            )
            .anchor(Anchor::Middle),
            TextRun::new(
                fit(&record.resi_number, Case::AsGiven, &resi, resi_inner.width - 4.0),
                resi_box.center_x(),
                resi_box.y + 20.0,
                resi,
            )
            .anchor(Anchor::Middle),
        ],
    );

    let area = Rect::new(
        col.x,
        hub_box.bottom() + 2.0,
        col.width,
        row.bottom() - hub_box.bottom() - 2.0,
    )
    .inset(GAP);
    match symbols.barcode_for(record) {
        Some(img) => {
            let w = img.natural_width().min(area.width);
            let h = img.options().bar_height.min(area.height);
            let rect = Rect::new(area.center_x() - w / 2.0, area.center_y() - h / 2.0, w, h);
            b.push(RegionId::Barcode, rect, Layer::Content, NodeContent::Barcode(img.clone()));
        }
        None => b.push(RegionId::Barcode, area, Layer::Content, NodeContent::Empty),
    }
}

fn address(b: &mut Builder, record: &LabelRecord, row: Rect) {
    let wm = TextStyle::new(80.0, Weight::Black).tracking(0.1);
    b.nodes.push(LayoutNode {
        region: RegionId::Watermark,
        rect: row,
        layer: Layer::Watermark,
        opacity: 0.1,
        clip: Some(row),
        // drawn whole; the row clip cuts whatever does not fit
        content: NodeContent::Text(vec![TextRun::new(
            record.watermark.clone(),
            row.center_x(),
            row.center_y(),
            wm,
        )
        .anchor(Anchor::Middle)]),
    });

    let heading = TextStyle::new(9.0, Weight::Black);

    // recipient
    let block = Rect::new(row.x, row.y, row.width * RECIPIENT_SHARE, row.height);
    let inner = block.inset(6.0);
    let mut y = inner.y;
    let name = TextStyle::new(12.0, Weight::Black);
    let mut runs = vec![TextRun::new("Penerima:", inner.x, y + 6.75, heading)];
    y += 13.5 + 2.0;
    runs.push(TextRun::new(
        fit(&record.recipient_name, Case::AsGiven, &name, inner.width),
        inner.x,
        y + 6.0,
        name,
    ));
    y += 12.0 + 4.0;
    b.text(RegionId::Recipient, Rect::new(inner.x, inner.y, inner.width, y - inner.y), runs);

    let phone_box = Rect::new(inner.x, y, inner.width.min(90.0), 16.0);
    b.frame(RegionId::RecipientPhone, phone_box, 1.0);
    let phone = TextStyle::new(8.0, Weight::Bold);
    let phone_inner = phone_box.inset(1.0);
    b.text(
        RegionId::RecipientPhone,
        phone_inner,
        vec![TextRun::new(
            fit(&record.recipient_phone, Case::AsGiven, &phone, phone_inner.width - 4.0),
            phone_box.center_x(),
            phone_box.center_y(),
            phone,
        )
        .anchor(Anchor::Middle)],
    );
    y += 16.0 + 4.0;

    let addr = TextStyle::new(8.5, Weight::Bold);
    let room = ((inner.bottom() - y) / ADDRESS_LINE_H).floor().max(0.0) as usize;
    let max_lines = ADDRESS_MAX_LINES.min(room);
    let lines = wrap_clamped(
        &Case::Upper.apply(&record.recipient_address),
        &addr,
        inner.width,
        max_lines,
    );
    let addr_rect = Rect::new(inner.x, y, inner.width, ADDRESS_LINE_H * max_lines as f32);
    let runs = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| TextRun::new(line, inner.x, y + ADDRESS_LINE_H * (i as f32 + 0.5), addr))
        .collect();
    b.text(RegionId::RecipientAddress, addr_rect, runs);

    // sender
    let block = Rect::new(block.right(), row.y, row.width - block.width, row.height);
    let inner = block.inset(6.0);
    let mut y = inner.y;
    let name = TextStyle::new(10.5, Weight::Bold);
    let phone = TextStyle::new(9.5, Weight::Bold);
    let city = TextStyle::new(10.0, Weight::Black).tracking(-0.025);
    let mut runs = vec![TextRun::new("Pengirim:", inner.x, y + 6.75, heading)];
    y += 13.5 + 2.0;
    runs.push(TextRun::new(
        fit(&record.sender_name, Case::AsGiven, &name, inner.width),
        inner.x,
        y + 5.25,
        name,
    ));
    y += 10.5 + 2.0;
    runs.push(TextRun::new(
        fit(&record.sender_phone, Case::AsGiven, &phone, inner.width),
        inner.x,
        y + 7.125,
        phone,
    ));
    y += 14.25 + 2.0;
    runs.push(TextRun::new(
        fit(&record.sender_city, Case::Upper, &city, inner.width),
        inner.x,
        y + 6.25,
        city,
    ));
    b.text(RegionId::Sender, inner, runs);
}

fn location_tags(b: &mut Builder, record: &LabelRecord, row: Rect) {
    let w = (row.width - 2.0 * GAP) / 3.0;
    let style = TextStyle::new(9.0, Weight::Bold);
    let tags = [
        (RegionId::District, &record.district),
        (RegionId::SubDistrict, &record.sub_district),
        (RegionId::Village, &record.village),
    ];
    for (i, (region, value)) in tags.into_iter().enumerate() {
        let rect = Rect::new(row.x + i as f32 * (w + GAP), row.y, w, row.height);
        b.frame(region, rect, 1.0);
        let inner = rect.inset(1.0);
        b.text(
            region,
            inner,
            vec![TextRun::new(
                fit(value, Case::Upper, &style, inner.width - 8.0),
                rect.center_x(),
                rect.center_y(),
                style,
            )
            .anchor(Anchor::Middle)],
        );
    }
}

fn cashless_banner(b: &mut Builder, record: &LabelRecord, row: Rect, mode: CashlessBanner) {
    b.rule(RegionId::CashlessBanner, Rect::new(row.x, row.y, row.width, 1.0), false);
    b.rule(
        RegionId::CashlessBanner,
        Rect::new(row.x, row.bottom() - 1.0, row.width, 1.0),
        false,
    );
    if mode == CashlessBanner::FollowRecord && !record.is_cashless {
        return;
    }

    let cy = row.center_y();
    let x = row.x + 6.0;
    let title = TextStyle::new(10.0, Weight::Black);
    let sep_x = x + title.measure(CASHLESS_TITLE) + 8.0 + 6.0;
    b.rule(RegionId::CashlessBanner, Rect::new(sep_x, cy - 6.0, 1.0, 12.0), false);

    let note = TextStyle::new(9.0, Weight::Bold).italic();
    let note_x = sep_x + 1.0 + 6.0;
    let inner = Rect::new(row.x, row.y + 1.0, row.width, row.height - 2.0);
    b.text(
        RegionId::CashlessBanner,
        inner,
        vec![
            TextRun::new(CASHLESS_TITLE, x, cy, title),
            TextRun::new(
                truncate_to_width(CASHLESS_NOTE, &note, row.right() - 6.0 - note_x),
                note_x,
                cy,
                note,
            ),
        ],
    );
}

fn meta_label_style() -> TextStyle {
    TextStyle::new(9.5, Weight::Black)
}

/// Push a "Label: value" pair; returns the x where the value ends.
fn meta_pair(
    runs: &mut Vec<TextRun>,
    label: &str,
    value: &str,
    value_style: TextStyle,
    x: f32,
    cy: f32,
    right: f32,
) -> f32 {
    let label_style = meta_label_style();
    let label = truncate_to_width(label, &label_style, (right - x).max(0.0));
    let vx = x + label_style.measure(&label) + 4.0;
    runs.push(TextRun::new(label, x, cy, label_style));
    let value = truncate_to_width(value, &value_style, (right - vx).max(0.0));
    let end = vx + value_style.measure(&value);
    if !value.is_empty() {
        runs.push(TextRun::new(value, vx, cy, value_style));
    }
    end
}

fn footer(b: &mut Builder, record: &LabelRecord, symbols: &EncodedSymbols, row: Rect) {
    let meta = Rect::new(row.x, row.y, row.width * (1.0 - QR_SHARE), row.height);
    let qr_col = Rect::new(meta.right(), row.y, row.width - meta.width, row.height);

    let value = TextStyle::new(9.5, Weight::Bold);
    let line_h = 14.25;
    let top = meta.y + (meta.height - (3.0 * line_h + 2.0 * 2.0)) / 2.0;
    let centre = |i: usize| top + line_h / 2.0 + i as f32 * (line_h + 2.0);
    let x0 = meta.x + 6.0;
    let right = meta.right() - 2.0;

    // the weight never pushes the COD label off the line; at worst it shows
    // as "COD…"
    let cod_min = meta_label_style().measure(&format!("{}{}", COD_LABEL_MIN, ELLIPSIS)) + 0.5;
    let mut runs = Vec::new();
    let end = meta_pair(
        &mut runs,
        "Berat:",
        &record.weight,
        value,
        x0,
        centre(0),
        right - META_PAIR_GAP - cod_min,
    );
    meta_pair(
        &mut runs,
        COD_LABEL,
        &record.cod_cek_dulu,
        value,
        end + META_PAIR_GAP,
        centre(0),
        right,
    );
    meta_pair(&mut runs, "Batas Kirim:", &record.batas_kirim, value, x0, centre(1), right);
    meta_pair(
        &mut runs,
        "No.Pesanan:",
        &record.order_id,
        value.tracking(-0.025),
        x0,
        centre(2),
        right,
    );
    b.text(RegionId::FooterMeta, Rect::new(meta.x, meta.y, right - meta.x, meta.height), runs);

    let area = qr_col.inset(2.0);
    match symbols.qr_for(record) {
        Some(img) => {
            let side = (img.size_px() as f32).min(area.width).min(area.height);
            let rect = Rect::new(
                area.center_x() - side / 2.0,
                area.center_y() - side / 2.0,
                side,
                side,
            );
            b.push(RegionId::QrCode, rect, Layer::Content, NodeContent::Qr(img.clone()));
        }
        None => b.push(RegionId::QrCode, area, Layer::Content, NodeContent::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolOptions;

    fn layout_default() -> LabelLayout {
        let record = LabelRecord::default();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        layout_label(&record, &symbols, &RenderConfig::default())
    }

    #[test]
    fn canvas_is_100mm_square() {
        let l = layout_default();
        assert!((l.width - 377.95).abs() < 0.01);
        assert_eq!(l.width, l.height);
    }

    #[test]
    fn default_fields_are_not_truncated() {
        let l = layout_default();
        assert_eq!(l.text_lines(RegionId::MainCode), vec!["U - 46\""]);
        assert_eq!(l.text_lines(RegionId::HubSubCode), vec!["TOM2-MH-11"]);
        assert_eq!(l.text_lines(RegionId::ResiText), vec!["NO. RESI:", "SPXID064356436531"]);
        assert_eq!(l.text_lines(RegionId::SubDistrict), vec!["BIRINGBULU"]);
        assert_eq!(l.text_lines(RegionId::Village), vec!["PARANGLOE"]);
    }

    #[test]
    fn trim_repeats_resi_three_times_per_edge() {
        let l = layout_default();
        for region in [
            RegionId::TrimTop,
            RegionId::TrimBottom,
            RegionId::TrimLeft,
            RegionId::TrimRight,
        ] {
            let lines = l.text_lines(region);
            assert_eq!(lines, vec!["SPXID064356436531"; 3]);
        }
    }

    #[test]
    fn regions_run_top_to_bottom() {
        let l = layout_default();
        let top = |r: RegionId| l.nodes_for(r).next().unwrap().rect.y;
        let order = [
            RegionId::ServiceType,
            RegionId::DividerTop,
            RegionId::MainCode,
            RegionId::DividerBottom,
            RegionId::Recipient,
            RegionId::District,
            RegionId::CashlessBanner,
            RegionId::FooterMeta,
        ];
        for pair in order.windows(2) {
            assert!(top(pair[0]) < top(pair[1]), "{:?} not above {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn rotated_extent_is_vertical() {
        let style = TextStyle::new(6.0, Weight::Bold);
        let run = TextRun::new("ABC", 6.0, 100.0, style)
            .anchor(Anchor::Middle)
            .rotated(-90.0);
        let e = run.extent();
        assert!((e.width - 6.0).abs() < 1e-4);
        assert!((e.center_y() - 100.0).abs() < 1e-3);
    }
}
