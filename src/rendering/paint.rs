/// Flattened paint commands produced from a label layout

use log::warn;

use crate::rendering::layout::{LabelLayout, NodeContent, Rect, TextRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Brand orange
    pub const BRAND: Color = Color::rgb(0xee, 0x4d, 0x2d);
    /// Express service red
    pub const EXPRESS: Color = Color::rgb(0xdc, 0x26, 0x26);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
        radius: f32,
        clip: Option<Rect>,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
        clip: Option<Rect>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
        /// Dash length; `None` for a solid line
        dash: Option<f32>,
        clip: Option<Rect>,
    },
    Text {
        run: TextRun,
        opacity: f32,
        clip: Option<Rect>,
    },
    /// Barcode bars, already scaled into place
    Bars {
        rects: Vec<Rect>,
        color: Color,
        clip: Option<Rect>,
    },
    Image {
        rect: Rect,
        data_uri: String,
        clip: Option<Rect>,
    },
}

/// Turn a layout into paint commands in back-to-front order.
///
/// A QR bitmap that cannot be encoded as PNG is dropped with a warning; the
/// region stays blank like any other symbol failure.
pub fn paint_layout(layout: &LabelLayout) -> Vec<PaintCommand> {
    let mut nodes: Vec<_> = layout.nodes.iter().collect();
    nodes.sort_by_key(|n| n.layer);

    let mut out = Vec::new();
    for node in nodes {
        let clip = node.clip;
        let rect = node.rect;
        match &node.content {
            NodeContent::Fill { color, radius } => out.push(PaintCommand::FillRect {
                rect,
                color: *color,
                radius: *radius,
                clip,
            }),
            NodeContent::Frame { stroke } => out.push(PaintCommand::StrokeRect {
                rect: Rect::new(
                    rect.x + stroke / 2.0,
                    rect.y + stroke / 2.0,
                    rect.width - stroke,
                    rect.height - stroke,
                ),
                color: Color::BLACK,
                width: *stroke,
                clip,
            }),
            NodeContent::Rule { dotted } => {
                let (from, to, width) = if rect.width >= rect.height {
                    ((rect.x, rect.center_y()), (rect.right(), rect.center_y()), rect.height)
                } else {
                    ((rect.center_x(), rect.y), (rect.center_x(), rect.bottom()), rect.width)
                };
                out.push(PaintCommand::Line {
                    from,
                    to,
                    width,
                    color: Color::BLACK,
                    dash: dotted.then_some(width),
                    clip,
                });
            }
            NodeContent::Text(runs) => {
                out.extend(runs.iter().filter(|r| !r.text.is_empty()).map(|run| {
                    PaintCommand::Text {
                        run: run.clone(),
                        opacity: node.opacity,
                        clip,
                    }
                }))
            }
            NodeContent::Barcode(img) => {
                let module = rect.width / img.module_count().max(1) as f32;
                let rects = img
                    .bars()
                    .iter()
                    .map(|bar| {
                        Rect::new(
                            rect.x + bar.start as f32 * module,
                            rect.y,
                            bar.width as f32 * module,
                            rect.height,
                        )
                    })
                    .collect();
                out.push(PaintCommand::Bars {
                    rects,
                    color: Color::BLACK,
                    clip,
                });
            }
            NodeContent::Qr(img) => match img.to_data_uri() {
                Ok(data_uri) => out.push(PaintCommand::Image {
                    rect,
                    data_uri,
                    clip,
                }),
                Err(e) => warn!("{}; leaving QR region blank", e),
            },
            NodeContent::Empty => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::layout_label;
    use crate::symbols::{EncodedSymbols, SymbolOptions};
    use crate::{LabelRecord, RenderConfig};

    #[test]
    fn color_hex() {
        assert_eq!(Color::BRAND.hex(), "#ee4d2d");
        assert_eq!(Color::EXPRESS.hex(), "#dc2626");
    }

    #[test]
    fn background_first_trim_last() {
        let record = LabelRecord::default();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        let layout = layout_label(&record, &symbols, &RenderConfig::default());
        let cmds = paint_layout(&layout);
        match cmds.first() {
            Some(PaintCommand::FillRect { color, .. }) => assert_eq!(*color, Color::WHITE),
            other => panic!("unexpected first command {:?}", other),
        }
        match cmds.last() {
            Some(PaintCommand::Text { run, .. }) => assert_eq!(run.text, "SPXID064356436531"),
            other => panic!("unexpected last command {:?}", other),
        }
        assert!(cmds.iter().any(|c| matches!(c, PaintCommand::Bars { .. })));
        assert!(cmds.iter().any(|c| matches!(c, PaintCommand::Image { .. })));
    }

    #[test]
    fn watermark_is_faded() {
        let record = LabelRecord::default();
        let layout = layout_label(&record, &EncodedSymbols::empty(), &RenderConfig::default());
        let faded: Vec<_> = paint_layout(&layout)
            .into_iter()
            .filter_map(|c| match c {
                PaintCommand::Text { run, opacity, .. } if opacity < 1.0 => Some(run.text),
                _ => None,
            })
            .collect();
        assert_eq!(faded, vec!["COD".to_string()]);
    }
}
