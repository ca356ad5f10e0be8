/// SVG serialisation of paint commands.
///
/// The document is sized in millimetres with a CSS px viewBox, so a viewer or
/// print pipeline reproduces the label at its physical 100mm x 100mm size.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::rendering::layout::{Anchor, Rect, TextRun, LABEL_SIZE_MM};
use crate::rendering::paint::PaintCommand;
use crate::Result;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Collects one `<clipPath>` per distinct clip rect
#[derive(Default)]
struct Clips {
    ids: HashMap<String, usize>,
    defs: String,
}

impl Clips {
    fn attr(&mut self, clip: Option<Rect>) -> Result<String> {
        let Some(r) = clip else {
            return Ok(String::new());
        };
        let key = format!("{:.2} {:.2} {:.2} {:.2}", r.x, r.y, r.width, r.height);
        let next = self.ids.len();
        let id = *self.ids.entry(key).or_insert(next);
        if id == next {
            write!(
                self.defs,
                "<clipPath id=\"c{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
                id, r.x, r.y, r.width, r.height
            )?;
        }
        Ok(format!(" clip-path=\"url(#c{})\"", id))
    }
}

fn write_text(out: &mut String, run: &TextRun, opacity: f32, clip: &str, font_family: &str) -> Result<()> {
    let anchor = match run.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let style = &run.style;
    write!(
        out,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.2}\" font-weight=\"{}\"",
        run.x,
        run.y,
        escape(font_family),
        style.size,
        style.weight.css()
    )?;
    if style.italic {
        out.push_str(" font-style=\"italic\"");
    }
    if style.letter_spacing != 0.0 {
        write!(out, " letter-spacing=\"{:.2}\"", style.letter_spacing * style.size)?;
    }
    write!(
        out,
        " text-anchor=\"{}\" dominant-baseline=\"central\" fill=\"{}\"",
        anchor,
        run.color.hex()
    )?;
    if opacity < 1.0 {
        write!(out, " fill-opacity=\"{:.2}\"", opacity)?;
    }
    if run.rotate != 0.0 {
        write!(out, " transform=\"rotate({:.1} {:.2} {:.2})\"", run.rotate, run.x, run.y)?;
    }
    write!(out, "{}>{}</text>", clip, escape(&run.text))?;
    Ok(())
}

/// Serialise `commands` as a standalone SVG document of `size` CSS px.
pub fn to_svg(commands: &[PaintCommand], size: f32, font_family: &str) -> Result<String> {
    let mut clips = Clips::default();
    let mut body = String::new();

    for cmd in commands {
        match cmd {
            PaintCommand::FillRect {
                rect,
                color,
                radius,
                clip,
            } => {
                let clip = clips.attr(*clip)?;
                write!(
                    body,
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"",
                    rect.x, rect.y, rect.width, rect.height
                )?;
                if *radius > 0.0 {
                    write!(body, " rx=\"{:.2}\"", radius)?;
                }
                write!(body, " fill=\"{}\"{}/>", color.hex(), clip)?;
            }
            PaintCommand::StrokeRect {
                rect,
                color,
                width,
                clip,
            } => {
                let clip = clips.attr(*clip)?;
                write!(
                    body,
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"{}/>",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    color.hex(),
                    width,
                    clip
                )?;
            }
            PaintCommand::Line {
                from,
                to,
                width,
                color,
                dash,
                clip,
            } => {
                let clip = clips.attr(*clip)?;
                write!(
                    body,
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"",
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    color.hex(),
                    width
                )?;
                if let Some(d) = dash {
                    write!(body, " stroke-dasharray=\"{:.2} {:.2}\"", d, d)?;
                }
                write!(body, "{}/>", clip)?;
            }
            PaintCommand::Text { run, opacity, clip } => {
                let clip = clips.attr(*clip)?;
                write_text(&mut body, run, *opacity, &clip, font_family)?;
            }
            PaintCommand::Bars { rects, color, clip } => {
                let clip = clips.attr(*clip)?;
                write!(body, "<g fill=\"{}\" shape-rendering=\"crispEdges\"{}>", color.hex(), clip)?;
                for r in rects {
                    write!(
                        body,
                        "<rect x=\"{:.3}\" y=\"{:.2}\" width=\"{:.3}\" height=\"{:.2}\"/>",
                        r.x, r.y, r.width, r.height
                    )?;
                }
                body.push_str("</g>");
            }
            PaintCommand::Image {
                rect,
                data_uri,
                clip,
            } => {
                let clip = clips.attr(*clip)?;
                write!(
                    body,
                    "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" preserveAspectRatio=\"none\" image-rendering=\"optimizeSpeed\" xlink:href=\"{}\"{}/>",
                    rect.x, rect.y, rect.width, rect.height, data_uri, clip
                )?;
            }
        }
    }

    let mut out = String::with_capacity(body.len() + clips.defs.len() + 256);
    write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{mm}mm\" height=\"{mm}mm\" viewBox=\"0 0 {s:.4} {s:.4}\">",
        mm = LABEL_SIZE_MM,
        s = size
    )?;
    if !clips.defs.is_empty() {
        write!(out, "<defs>{}</defs>", clips.defs)?;
    }
    out.push_str(&body);
    out.push_str("</svg>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::Color;
    use crate::rendering::text::{TextStyle, Weight};

    #[test]
    fn escapes_markup_in_text() {
        let run = TextRun::new("A&B <C> \"D\"", 1.0, 2.0, TextStyle::new(9.0, Weight::Bold));
        let cmds = vec![PaintCommand::Text {
            run,
            opacity: 1.0,
            clip: None,
        }];
        let svg = to_svg(&cmds, 100.0, "DejaVu Sans").unwrap();
        assert!(svg.contains("A&amp;B &lt;C&gt; &quot;D&quot;"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn shares_clip_paths() {
        let clip = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        let fill = PaintCommand::FillRect {
            rect: Rect::new(1.0, 1.0, 2.0, 2.0),
            color: Color::BLACK,
            radius: 0.0,
            clip,
        };
        let svg = to_svg(&[fill.clone(), fill], 100.0, "DejaVu Sans").unwrap();
        assert_eq!(svg.matches("<clipPath").count(), 1);
        assert_eq!(svg.matches("url(#c0)").count(), 2);
    }

    #[test]
    fn document_is_sized_in_mm() {
        let svg = to_svg(&[], 377.9528, "DejaVu Sans").unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("width=\"100mm\" height=\"100mm\""));
        assert!(svg.contains("viewBox=\"0 0 377.9528 377.9528\""));
    }
}
