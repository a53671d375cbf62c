use std::io::{Cursor, Write};

use async_trait::async_trait;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::{DocumentError, DocumentResult};
use crate::models::OutputFormat;
use crate::templates::theme::{DETAIL_COLOR, MUTED_BACKGROUND, RULE_COLOR, BODY_TEXT_COLOR};
use crate::templates::{DocumentView, LOGO_FILE};
use super::{DocumentRenderer, LogoImage};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const DOC_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Ancho útil de una página A4 con márgenes de 2 cm, en twips
const CONTENT_WIDTH: u32 = 9638;
/// 1.2 pulgadas en EMU
const LOGO_WIDTH_EMU: u64 = 1_097_280;

/// Generador de documentos Word (OOXML) sin dependencias externas de ofimática
pub struct DocxRenderer;

#[async_trait]
impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    async fn render(&self, view: &DocumentView, logo: Option<&LogoImage>) -> DocumentResult<Vec<u8>> {
        // Trabajo CPU-bound en tarea bloqueante
        let view = view.clone();
        let logo = logo.cloned();
        tokio::task::spawn_blocking(move || build_docx(&view, logo.as_ref()))
            .await
            .map_err(|e| DocumentError::Render(format!("docx task failed: {}", e)))?
    }
}

/// Empaqueta todas las partes del documento en un ZIP
pub fn build_docx(view: &DocumentView, logo: Option<&LogoImage>) -> DocumentResult<Vec<u8>> {
    let mut parts: Vec<(&str, Vec<u8>)> = vec![
        ("[Content_Types].xml", content_types(logo.is_some()).into_bytes()),
        ("_rels/.rels", package_rels().into_bytes()),
        ("word/_rels/document.xml.rels", document_rels(logo.is_some()).into_bytes()),
        ("word/document.xml", document_xml(view, logo)?),
        ("word/styles.xml", styles_xml().into_bytes()),
        ("word/footer1.xml", footer_xml(view)?),
        ("docProps/core.xml", core_xml(view).into_bytes()),
        ("docProps/app.xml", app_xml().into_bytes()),
    ];
    if let Some(logo) = logo {
        parts.push(("word/media/logo.png", logo.png.clone()));
    }

    let zip_err = |e: zip::result::ZipError| DocumentError::Render(format!("docx packaging: {}", e));
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in parts {
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(&bytes)?;
    }

    Ok(zip.finish().map_err(zip_err)?.into_inner())
}

#[derive(Clone, Copy, Default)]
struct Run<'a> {
    text: &'a str,
    bold: bool,
    size: Option<u32>,
    color: Option<&'a str>,
}

impl<'a> Run<'a> {
    fn new(text: &'a str) -> Self {
        Run { text, ..Default::default() }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Tamaño en medios puntos
    fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    fn color(mut self, color: &'a str) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Clone, Copy)]
struct Para<'a> {
    align: Option<&'static str>,
    before: u32,
    after: u32,
    border_bottom: Option<(&'a str, u32)>,
}

impl Default for Para<'_> {
    fn default() -> Self {
        Para {
            align: None,
            before: 0,
            after: 40,
            border_bottom: None,
        }
    }
}

impl<'a> Para<'a> {
    fn right() -> Self {
        Para { align: Some("right"), ..Default::default() }
    }

    fn center() -> Self {
        Para { align: Some("center"), ..Default::default() }
    }

    fn before(mut self, twips: u32) -> Self {
        self.before = twips;
        self
    }

    fn after(mut self, twips: u32) -> Self {
        self.after = twips;
        self
    }

    fn border_bottom(mut self, color: &'a str, size: u32) -> Self {
        self.border_bottom = Some((color, size));
        self
    }
}

/// Escritor XML con los atajos de WordprocessingML que usamos
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> DocumentResult<Self> {
        let mut part = XmlPart { writer: Writer::new(Vec::new()) };
        part.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    fn event(&mut self, event: Event<'_>) -> DocumentResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DocumentError::Render(format!("docx xml: {}", e)))
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> DocumentResult<()> {
        self.event(Event::Start(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    fn close(&mut self, name: &str) -> DocumentResult<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> DocumentResult<()> {
        self.event(Event::Empty(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    /// XML ya formado, se escribe tal cual
    fn raw(&mut self, xml: &str) -> DocumentResult<()> {
        self.event(Event::Text(BytesText::from_escaped(xml)))
    }

    fn run_properties(&mut self, run: &Run<'_>) -> DocumentResult<()> {
        self.open("w:rPr", &[])?;
        if run.bold {
            self.empty("w:b", &[])?;
        }
        if let Some(color) = run.color {
            self.empty("w:color", &[("w:val", color)])?;
        }
        if let Some(size) = run.size {
            let size = size.to_string();
            self.empty("w:sz", &[("w:val", size.as_str())])?;
        }
        self.close("w:rPr")
    }

    fn run(&mut self, run: &Run<'_>) -> DocumentResult<()> {
        self.open("w:r", &[])?;
        self.run_properties(run)?;
        self.open("w:t", &[("xml:space", "preserve")])?;
        self.event(Event::Text(BytesText::new(run.text)))?;
        self.close("w:t")?;
        self.close("w:r")
    }

    fn paragraph_open(&mut self, para: Para<'_>) -> DocumentResult<()> {
        self.open("w:p", &[])?;
        self.open("w:pPr", &[])?;
        if let Some((color, size)) = para.border_bottom {
            let size = size.to_string();
            self.open("w:pBdr", &[])?;
            self.empty(
                "w:bottom",
                &[("w:val", "single"), ("w:sz", size.as_str()), ("w:space", "1"), ("w:color", color)],
            )?;
            self.close("w:pBdr")?;
        }
        let (before, after) = (para.before.to_string(), para.after.to_string());
        self.empty("w:spacing", &[("w:before", before.as_str()), ("w:after", after.as_str())])?;
        if let Some(align) = para.align {
            self.empty("w:jc", &[("w:val", align)])?;
        }
        self.close("w:pPr")
    }

    fn paragraph(&mut self, para: Para<'_>, runs: &[Run<'_>]) -> DocumentResult<()> {
        self.paragraph_open(para)?;
        for run in runs {
            self.run(run)?;
        }
        self.close("w:p")
    }

    /// Tabla de ancho fijo; `rule` dibuja separadores horizontales de ese color
    fn table_open(&mut self, widths: &[u32], rule: Option<&str>, align_right: bool) -> DocumentResult<()> {
        let total = widths.iter().sum::<u32>().to_string();

        self.open("w:tbl", &[])?;
        self.open("w:tblPr", &[])?;
        self.empty("w:tblW", &[("w:w", total.as_str()), ("w:type", "dxa")])?;
        if align_right {
            self.empty("w:jc", &[("w:val", "right")])?;
        }
        self.open("w:tblBorders", &[])?;
        for side in ["w:top", "w:left", "w:right", "w:insideV"] {
            self.empty(side, &[("w:val", "nil")])?;
        }
        for side in ["w:bottom", "w:insideH"] {
            match rule {
                Some(color) => self.empty(
                    side,
                    &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", color)],
                )?,
                None => self.empty(side, &[("w:val", "nil")])?,
            }
        }
        self.close("w:tblBorders")?;
        self.empty("w:tblLayout", &[("w:type", "fixed")])?;
        self.open("w:tblCellMar", &[])?;
        for side in ["w:top", "w:bottom"] {
            self.empty(side, &[("w:w", "60"), ("w:type", "dxa")])?;
        }
        for side in ["w:left", "w:right"] {
            self.empty(side, &[("w:w", "100"), ("w:type", "dxa")])?;
        }
        self.close("w:tblCellMar")?;
        self.close("w:tblPr")?;

        self.open("w:tblGrid", &[])?;
        for width in widths {
            let width = width.to_string();
            self.empty("w:gridCol", &[("w:w", width.as_str())])?;
        }
        self.close("w:tblGrid")
    }

    fn row_open(&mut self, header: bool) -> DocumentResult<()> {
        self.open("w:tr", &[])?;
        if header {
            self.open("w:trPr", &[])?;
            self.empty("w:tblHeader", &[])?;
            self.close("w:trPr")?;
        }
        Ok(())
    }

    fn cell_open(&mut self, width: u32, fill: Option<&str>) -> DocumentResult<()> {
        let width = width.to_string();
        self.open("w:tc", &[])?;
        self.open("w:tcPr", &[])?;
        self.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if let Some(fill) = fill {
            self.empty("w:shd", &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)])?;
        }
        self.close("w:tcPr")
    }

    /// Celda con un único párrafo
    fn cell(&mut self, width: u32, fill: Option<&str>, para: Para<'_>, runs: &[Run<'_>]) -> DocumentResult<()> {
        self.cell_open(width, fill)?;
        self.paragraph(para.after(0), runs)?;
        self.close("w:tc")
    }

    fn field(&mut self, instruction: &str, placeholder: &str) -> DocumentResult<()> {
        let props = r#"<w:rPr><w:color w:val="7f8c8d"/><w:sz w:val="16"/></w:rPr>"#;
        self.raw(&format!(
            concat!(
                r#"<w:r>{p}<w:fldChar w:fldCharType="begin"/></w:r>"#,
                r#"<w:r>{p}<w:instrText xml:space="preserve"> {i} </w:instrText></w:r>"#,
                r#"<w:r>{p}<w:fldChar w:fldCharType="separate"/></w:r>"#,
                r#"<w:r>{p}<w:t>{v}</w:t></w:r>"#,
                r#"<w:r>{p}<w:fldChar w:fldCharType="end"/></w:r>"#,
            ),
            p = props,
            i = instruction,
            v = placeholder,
        ))
    }

    fn logo(&mut self, logo: &LogoImage) -> DocumentResult<()> {
        let cx = LOGO_WIDTH_EMU;
        let cy = if logo.width == 0 {
            cx
        } else {
            cx * u64::from(logo.height) / u64::from(logo.width)
        };

        self.paragraph_open(Para::default().after(0))?;
        self.raw(&format!(
            concat!(
                r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" name="Logo"/>"#,
                r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
                r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="rIdLogo"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
                r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
            ),
            cx = cx,
            cy = cy,
            name = LOGO_FILE,
        ))?;
        self.close("w:p")
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn section_heading(xml: &mut XmlPart, text: &str, color: &str) -> DocumentResult<()> {
    xml.paragraph(Para::default().before(240).after(80), &[Run::new(text).bold().color(color)])
}

fn document_xml(view: &DocumentView, logo: Option<&LogoImage>) -> DocumentResult<Vec<u8>> {
    let theme = &view.theme;
    let half = CONTENT_WIDTH / 2;
    let mut xml = XmlPart::new()?;

    xml.open("w:document", &[("xmlns:w", W_NS), ("xmlns:r", R_NS), ("xmlns:wp", WP_NS)])?;
    xml.open("w:body", &[])?;

    // Cabecera: logo o nombre del emisor, y título
    xml.table_open(&[half, half], None, false)?;
    xml.row_open(false)?;
    xml.cell_open(half, None)?;
    match logo {
        Some(logo) => xml.logo(logo)?,
        None => xml.paragraph(
            Para::default().after(0),
            &[Run::new(&view.supplier.name).bold().size(32).color(theme.primary)],
        )?,
    }
    xml.close("w:tc")?;
    xml.cell(half, None, Para::right(), &[Run::new(view.title).bold().size(48).color(theme.primary)])?;
    xml.close("w:tr")?;
    xml.close("w:tbl")?;
    xml.paragraph(Para::default().after(200).border_bottom(theme.accent, 18), &[])?;

    // Identificación
    xml.table_open(&[2600, CONTENT_WIDTH - 2600], None, false)?;
    for row in &view.info_rows {
        let label = format!("{} :", row.label);
        let value = match &row.color {
            Some(color) => Run::new(&row.value).bold().color(color),
            None => Run::new(&row.value),
        };
        xml.row_open(false)?;
        xml.cell(2600, None, Para::default(), &[Run::new(&label).bold()])?;
        xml.cell(CONTENT_WIDTH - 2600, None, Para::default(), &[value])?;
        xml.close("w:tr")?;
    }
    xml.close("w:tbl")?;
    xml.paragraph(Para::default().after(120), &[])?;

    // Emisor y cliente
    xml.table_open(&[half, half], None, false)?;
    xml.row_open(false)?;
    for party in [&view.supplier, &view.client] {
        xml.cell_open(half, Some(MUTED_BACKGROUND))?;
        xml.paragraph(Para::default(), &[Run::new(party.heading).bold().size(18).color(theme.primary)])?;
        xml.paragraph(Para::default(), &[Run::new(&party.name).bold()])?;
        for line in &party.lines {
            xml.paragraph(Para::default().after(0), &[Run::new(line)])?;
        }
        xml.close("w:tc")?;
    }
    xml.close("w:tr")?;
    xml.close("w:tbl")?;

    if let Some(intro) = &view.intro_text {
        xml.paragraph(Para::default().before(200).after(120), &[Run::new(intro)])?;
    } else {
        xml.paragraph(Para::default().after(120), &[])?;
    }

    // Líneas
    let widths = [4238, 800, 1600, 1000, 2000];
    let headers = ["Description", "Qté", "Prix unitaire", "TVA", "Total HT"];
    xml.table_open(&widths, Some(RULE_COLOR), false)?;
    xml.row_open(true)?;
    for (i, (width, header)) in widths.iter().zip(headers).enumerate() {
        let para = if i == 0 { Para::default() } else { Para::right() };
        xml.cell(*width, Some(theme.header_bg), para, &[Run::new(header).bold().color("FFFFFF")])?;
    }
    xml.close("w:tr")?;

    for item in &view.items {
        xml.row_open(false)?;
        xml.cell_open(widths[0], None)?;
        xml.paragraph(Para::default().after(0), &[Run::new(&item.description).bold()])?;
        for detail in &item.details {
            xml.paragraph(Para::default().after(0), &[Run::new(detail).size(16).color(DETAIL_COLOR)])?;
        }
        if let Some(discount) = &item.discount {
            let text = format!("Remise : {}", discount);
            xml.paragraph(Para::default().after(0), &[Run::new(&text).size(16).color(DETAIL_COLOR)])?;
        }
        xml.close("w:tc")?;

        let amounts = [&item.quantity, &item.unit_price, &item.tax_rate, &item.net_amount];
        for (width, value) in widths[1..].iter().zip(amounts) {
            xml.cell(*width, None, Para::right(), &[Run::new(value)])?;
        }
        xml.close("w:tr")?;
    }
    xml.close("w:tbl")?;
    xml.paragraph(Para::default().after(120), &[])?;

    // Totales
    let totals = &view.totals;
    xml.table_open(&[2600, 2000], None, true)?;
    for (label, value) in [
        ("Total HT", &totals.total_net),
        (totals.tax_label.as_str(), &totals.total_tax),
    ] {
        xml.row_open(false)?;
        xml.cell(2600, None, Para::default(), &[Run::new(label)])?;
        xml.cell(2000, None, Para::right(), &[Run::new(value)])?;
        xml.close("w:tr")?;
    }
    xml.row_open(false)?;
    xml.cell(2600, Some(theme.primary), Para::default(), &[Run::new("TOTAL TTC").bold().color("FFFFFF")])?;
    xml.cell(
        2000,
        Some(theme.primary),
        Para::right(),
        &[Run::new(&totals.total_gross).bold().color("FFFFFF")],
    )?;
    xml.close("w:tr")?;
    xml.close("w:tbl")?;

    if view.payment_terms.is_some() || view.late_penalties.is_some() {
        section_heading(&mut xml, "CONDITIONS DE PAIEMENT", theme.primary)?;
        if let Some(terms) = &view.payment_terms {
            xml.paragraph(Para::default(), &[Run::new(terms)])?;
        }
        if let Some(penalties) = &view.late_penalties {
            xml.paragraph(Para::default(), &[Run::new(penalties).size(16).color(DETAIL_COLOR)])?;
        }
    }

    if !view.bank_rows.is_empty() {
        section_heading(&mut xml, "COORDONNÉES BANCAIRES", theme.primary)?;
        xml.table_open(&[1600, CONTENT_WIDTH - 1600], None, false)?;
        for row in &view.bank_rows {
            let label = format!("{} :", row.label);
            xml.row_open(false)?;
            xml.cell(1600, None, Para::default(), &[Run::new(&label).bold()])?;
            xml.cell(CONTENT_WIDTH - 1600, None, Para::default(), &[Run::new(&row.value)])?;
            xml.close("w:tr")?;
        }
        xml.close("w:tbl")?;
    }

    if let Some(closing) = &view.closing_text {
        xml.paragraph(Para::default().before(240), &[Run::new(closing)])?;
    }

    if view.signature {
        xml.paragraph(Para::default().after(200), &[])?;
        xml.table_open(&[4300], None, true)?;
        xml.row_open(false)?;
        xml.cell_open(4300, None)?;
        xml.paragraph(Para::default(), &[Run::new("Bon pour accord").bold()])?;
        xml.paragraph(
            Para::default(),
            &[Run::new("Date et signature du client").size(16).color(DETAIL_COLOR)],
        )?;
        xml.paragraph(Para::default().after(800).border_bottom(DETAIL_COLOR, 4), &[])?;
        xml.close("w:tc")?;
        xml.close("w:tr")?;
        xml.close("w:tbl")?;
    }

    xml.open("w:sectPr", &[])?;
    xml.empty("w:footerReference", &[("w:type", "default"), ("r:id", "rIdFooter")])?;
    xml.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", "850"),
            ("w:right", "1134"),
            ("w:bottom", "1418"),
            ("w:left", "1134"),
            ("w:header", "567"),
            ("w:footer", "567"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;

    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn footer_xml(view: &DocumentView) -> DocumentResult<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("w:ftr", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;

    xml.paragraph(Para::center().after(0).border_bottom(RULE_COLOR, 4), &[])?;
    if !view.footer.email.is_empty() {
        xml.paragraph(Para::center().after(0), &[small(&view.footer.email)])?;
    }
    xml.paragraph(Para::center().after(0), &[small(&view.footer.legal)])?;

    xml.paragraph_open(Para::center().after(0))?;
    xml.run(&small("Page "))?;
    xml.field("PAGE", "1")?;
    xml.run(&small("/"))?;
    xml.field("NUMPAGES", "1")?;
    xml.close("w:p")?;

    xml.close("w:ftr")?;
    Ok(xml.finish())
}

fn small(text: &str) -> Run<'_> {
    Run::new(text).size(16).color(DETAIL_COLOR)
}

fn content_types(with_logo: bool) -> String {
    let png = if with_logo {
        r#"<Default Extension="png" ContentType="image/png"/>"#
    } else {
        ""
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            "{png}",
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
            r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
            r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#,
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            "</Types>",
        ),
        png = png,
    )
}

fn package_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/officeDocument" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{rel}/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>",
        ),
        ns = REL_NS,
        rel = DOC_REL,
    )
}

fn document_rels(with_logo: bool) -> String {
    let logo = if with_logo {
        format!(
            r#"<Relationship Id="rIdLogo" Type="{}/image" Target="media/{}"/>"#,
            DOC_REL, LOGO_FILE
        )
    } else {
        String::new()
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rIdStyles" Type="{rel}/styles" Target="styles.xml"/>"#,
            r#"<Relationship Id="rIdFooter" Type="{rel}/footer" Target="footer1.xml"/>"#,
            "{logo}",
            "</Relationships>",
        ),
        ns = REL_NS,
        rel = DOC_REL,
        logo = logo,
    )
}

fn styles_xml() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:styles xmlns:w="{ns}">"#,
            r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial" w:eastAsia="Arial"/>"#,
            r#"<w:color w:val="{color}"/><w:sz w:val="20"/><w:szCs w:val="20"/><w:lang w:val="fr-FR"/>"#,
            r#"</w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr><w:spacing w:after="40" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
            r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/>"#,
            r#"<w:tblPr><w:tblInd w:w="0" w:type="dxa"/></w:tblPr></w:style>"#,
            "</w:styles>",
        ),
        ns = W_NS,
        color = BODY_TEXT_COLOR,
    )
}

fn core_xml(view: &DocumentView) -> String {
    let title = format!("{} {}", view.title, view.number);
    let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title>",
            "<dc:creator>{creator}</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            "</cp:coreProperties>",
        ),
        title = escape(title.as_str()),
        creator = escape(view.supplier.name.as_str()),
        created = created,
    )
}

fn app_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
        "<Application>quote-invoice-generator</Application>",
        "</Properties>",
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DocumentDefaults;
    use crate::models::{DocumentAggregate, DocumentKind, DocumentOptions, LineItem};
    use crate::templates::Theme;
    use rust_decimal_macros::dec;
    use std::io::Read;

    fn view(kind: DocumentKind) -> DocumentView {
        let options = DocumentOptions {
            number: Some("D-2025-0A1".to_string()),
            client_name: Some("Boulangerie Martin & Fils".to_string()),
            client_address: Some("3 Rue B".to_string()),
            client_city: Some("69001 Lyon".to_string()),
            client_tax_id: Some("552100554".to_string()),
            client_vat_number: Some("FR40552100554".to_string()),
            payment_terms: Some("30 jours fin de mois".to_string()),
            ..Default::default()
        };
        let mut doc = DocumentAggregate::new(kind, options, &DocumentDefaults::default()).unwrap();
        doc.add_item(
            LineItem::new("Site vitrine")
                .with_details(vec!["5 pages".to_string()])
                .with_unit_price(dec!(2500))
                .with_discount(dec!(250)),
        );
        doc.compute_totals();
        DocumentView::new(&doc, Theme::by_name("green"))
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn quote_docx_has_all_parts_and_content() {
        let bytes = build_docx(&view(DocumentKind::Quote), None).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(">DEVIS<"));
        assert!(document.contains("D-2025-0A1"));
        assert!(document.contains("Boulangerie Martin &amp; Fils"));
        assert!(document.contains("2 250.00 €"));
        assert!(document.contains("2 700.00 €"));
        assert!(document.contains("Remise : -250.00 €"));
        assert!(document.contains("CONDITIONS DE PAIEMENT"));
        assert!(document.contains("Bon pour accord"));
        assert!(document.contains(r#"w:fill="1e8449""#));
        assert!(!document.contains("w:drawing"));

        let footer = read_part(&bytes, "word/footer1.xml");
        assert!(footer.contains("contact@infinytia.com"));
        assert!(footer.contains("Infinytia - SIRET: 93968736400017 - TVA: FR939687364"));
        assert!(footer.contains("NUMPAGES"));

        assert!(read_part(&bytes, "[Content_Types].xml").contains("footer+xml"));
        assert!(read_part(&bytes, "docProps/core.xml").contains("DEVIS D-2025-0A1"));
    }

    #[test]
    fn invoice_docx_embeds_logo_and_skips_signature() {
        let logo = LogoImage {
            png: vec![0x89, b'P', b'N', b'G'],
            width: 200,
            height: 100,
        };
        let bytes = build_docx(&view(DocumentKind::Invoice), Some(&logo)).unwrap();

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(">FACTURE<"));
        assert!(document.contains(r#"r:embed="rIdLogo""#));
        assert!(document.contains(r#"cx="1097280" cy="548640""#));
        assert!(!document.contains("Bon pour accord"));

        assert!(read_part(&bytes, "word/_rels/document.xml.rels").contains("media/logo.png"));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("image/png"));

        let mut archive = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        assert_eq!(archive.by_name("word/media/logo.png").unwrap().size(), 4);
    }
}
