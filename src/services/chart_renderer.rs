// src/services/chart_renderer.rs

//! Desenho dos gráficos de barras e pizza numa superfície RGB.
//!
//! Todas as chamadas de desenho usam coordenadas em pixels CSS; a
//! `Surface` multiplica pelo `dpr` antes de passar as primitivas ao
//! `BitMapBackend` do plotters, igual ao `ctx.scale(dpr, dpr)` de um canvas.

use std::f64::consts::{FRAC_PI_4, TAU};

use image::{
    error::{ParameterError, ParameterErrorKind},
    DynamicImage, ImageError, ImageOutputFormat, RgbImage,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackendError;

use crate::{
    common::i18n::Lang,
    models::chart::{ChartData, ChartDimensions, ChartKind},
    services::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT},
};

// Espaço reservado acima (valor) e abaixo (rótulo) das barras
pub const BAR_LABEL_BAND: f32 = 20.0;
pub const BAR_MARGIN: f32 = BAR_LABEL_BAND * 2.0;

pub const LEGEND_MAX_ENTRIES: usize = 8;
pub const LEGEND_LABEL_CHARS: usize = 14;
const LEGEND_LINE_HEIGHT: f32 = 18.0;
const LEGEND_SWATCH: f32 = 10.0;
const PIE_PADDING: f32 = 10.0;

const MAX_DPR: f32 = 4.0;
const MAX_SIDE: u32 = 4096;

// Passo máximo do arco ao aproximar uma fatia por polígono
const ARC_STEP: f64 = TAU / 360.0;

type PlotResult = Result<(), DrawingAreaErrorKind<BitMapBackendError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background: RGBColor,
    pub text: RGBColor,
    pub bar: RGBColor,
    pub palette: Vec<RGBColor>,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            text: RGBColor(55, 65, 81),
            bar: RGBColor(59, 130, 246),
            palette: vec![
                RGBColor(59, 130, 246),
                RGBColor(16, 185, 129),
                RGBColor(245, 158, 11),
                RGBColor(239, 68, 68),
                RGBColor(139, 92, 246),
                RGBColor(236, 72, 153),
                RGBColor(20, 184, 166),
                RGBColor(249, 115, 22),
            ],
        }
    }
}

impl ChartTheme {
    /// Cor da fatia `index`, ciclando a paleta.
    pub fn color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            return self.bar;
        }
        self.palette[index % self.palette.len()]
    }
}

// =========================================================================
//  SUPERFÍCIE
// =========================================================================

#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    dpr: f32,
    backing: (u32, u32),
    // RGB8 linha a linha, o formato do BitMapBackend
    buffer: Vec<u8>,
}

// O buffer físico nunca passa de MAX_SIDE por lado: em telas grandes o dpr cede
fn sanitize(width: u32, height: u32, dpr: f32) -> (u32, u32, f32) {
    let (width, height) = (width.clamp(1, MAX_SIDE), height.clamp(1, MAX_SIDE));
    let dpr = if dpr.is_finite() {
        dpr.clamp(1.0, MAX_DPR)
    } else {
        1.0
    };
    let limit = MAX_SIDE as f32 / width.max(height) as f32;
    (width, height, dpr.min(limit).max(1.0))
}

fn backing(width: u32, height: u32, dpr: f32) -> (u32, u32) {
    (
        ((width as f32 * dpr).round() as u32).max(1),
        ((height as f32 * dpr).round() as u32).max(1),
    )
}

fn blank(backing: (u32, u32)) -> Vec<u8> {
    vec![0; backing.0 as usize * backing.1 as usize * 3]
}

impl Surface {
    pub fn new(width: u32, height: u32, dpr: f32) -> Self {
        let (width, height, dpr) = sanitize(width, height, dpr);
        let backing = backing(width, height, dpr);
        Self {
            width,
            height,
            dpr,
            backing,
            buffer: blank(backing),
        }
    }

    pub fn from_dimensions(dims: &ChartDimensions) -> Self {
        Self::new(dims.width, dims.height, dims.dpr)
    }

    /// Recalcula o buffer se as dimensões mudaram. Retorna `false` (e não
    /// mexe em nada) quando são as mesmas.
    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) -> bool {
        let (width, height, dpr) = sanitize(width, height, dpr);
        if width == self.width && height == self.height && dpr == self.dpr {
            return false;
        }

        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.backing = backing(width, height, dpr);
        self.buffer = blank(self.backing);
        true
    }

    pub fn width(&self) -> f32 {
        self.width as f32
    }

    pub fn height(&self) -> f32 {
        self.height as f32
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    /// Pixel do buffer, em coordenadas físicas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBColor> {
        let (bw, bh) = self.backing;
        if x >= bw || y >= bh {
            return None;
        }
        let idx = (y as usize * bw as usize + x as usize) * 3;
        Some(RGBColor(
            self.buffer[idx],
            self.buffer[idx + 1],
            self.buffer[idx + 2],
        ))
    }

    // Abre o buffer como área do plotters, em pixels físicos
    fn paint<F>(&mut self, draw: F)
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> PlotResult,
    {
        let backend = BitMapBackend::with_buffer(&mut self.buffer, self.backing);
        let area = backend.into_drawing_area();
        if let Err(err) = draw(&area).and_then(|_| area.present()) {
            tracing::warn!("Falha ao desenhar no gráfico: {:?}", err);
        }
    }

    pub fn clear(&mut self, color: RGBColor) {
        self.paint(|area| area.fill(&color));
    }

    fn to_backing_x(&self, x: f32) -> i32 {
        ((x * self.dpr).round().max(0.0) as i32).min(self.backing.0 as i32)
    }

    fn to_backing_y(&self, y: f32) -> i32 {
        ((y * self.dpr).round().max(0.0) as i32).min(self.backing.1 as i32)
    }

    // Retângulo CSS -> cantos físicos inclusivos; None quando não cobre pixel
    fn backing_rect(&self, x: f32, y: f32, width: f32, height: f32) -> Option<[(i32, i32); 2]> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let (x0, x1) = (self.to_backing_x(x), self.to_backing_x(x + width));
        let (y0, y1) = (self.to_backing_y(y), self.to_backing_y(y + height));
        (x1 > x0 && y1 > y0).then_some([(x0, y0), (x1 - 1, y1 - 1)])
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: RGBColor) {
        let Some(corners) = self.backing_rect(x, y, width, height) else {
            return;
        };
        self.paint(|area| area.draw(&Rectangle::new(corners, color.filled())));
    }

    /// Fatia de círculo; ângulo 0 no eixo x, crescendo no sentido horário
    /// (y para baixo), como no canvas.
    pub fn fill_sector(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start: f64,
        end: f64,
        color: RGBColor,
    ) {
        if radius <= 0.0 || end <= start {
            return;
        }
        let dpr = f64::from(self.dpr);
        let (cx, cy, r) = (f64::from(cx) * dpr, f64::from(cy) * dpr, f64::from(radius) * dpr);
        let center = (cx.round() as i32, cy.round() as i32);

        if end - start >= TAU {
            self.paint(|area| area.draw(&Circle::new(center, r.round() as i32, color.filled())));
            return;
        }

        // Pedaços de no máximo 45 graus: cada polígono fica convexo
        let mut pieces = Vec::new();
        let mut from = start;
        while from < end {
            let to = (from + FRAC_PI_4).min(end);
            let steps = ((to - from) / ARC_STEP).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for step in 0..=steps {
                let angle = from + (to - from) * step as f64 / steps as f64;
                points.push((
                    (cx + r * angle.cos()).round() as i32,
                    (cy + r * angle.sin()).round() as i32,
                ));
            }
            pieces.push(points);
            from = to;
        }

        self.paint(|area| {
            for points in pieces {
                area.draw(&Polygon::new(points, color.filled()))?;
            }
            Ok(())
        });
    }

    /// Largura do texto em pixels CSS para um tamanho de pixel de fonte `size`.
    pub fn text_width(text: &str, size: f32) -> f32 {
        let chars = text.chars().count() as f32;
        if chars == 0.0 {
            return 0.0;
        }
        (chars * GLYPH_ADVANCE as f32 - 1.0) * size
    }

    /// `y` é o topo da linha de texto. Cada célula acesa da fonte vira um
    /// retângulo, então o texto escala com o `dpr` como o resto.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        align: TextAlign,
        color: RGBColor,
    ) {
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - Self::text_width(text, size) / 2.0,
        };

        let cells: Vec<[(i32, i32); 2]> = text
            .chars()
            .enumerate()
            .flat_map(|(i, c)| {
                let origin = start_x + (i as u32 * GLYPH_ADVANCE) as f32 * size;
                glyphs::lit_cells(c).map(move |(col, row)| {
                    (origin + col as f32 * size, y + row as f32 * size)
                })
            })
            .filter_map(|(cell_x, cell_y)| self.backing_rect(cell_x, cell_y, size, size))
            .collect();

        if cells.is_empty() {
            return;
        }
        self.paint(|area| {
            for corners in cells {
                area.draw(&Rectangle::new(corners, color.filled()))?;
            }
            Ok(())
        });
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let (bw, bh) = self.backing;
        let image = RgbImage::from_raw(bw, bh, self.buffer.clone()).ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
        })?;

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image).write_to(&mut bytes, ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}

// =========================================================================
//  GEOMETRIA (pura, testável sem pixels)
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Barras de largura `W / 2n`, espalhadas de ponta a ponta (uma só fica
/// centralizada). Altura relativa ao maior valor, com piso 1.
pub fn bar_layout(values: &[f64], width: f32, height: f32) -> Vec<BarGeometry> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let bar_width = width / (n as f32 * 2.0);
    let max_value = values
        .iter()
        .copied()
        .map(finite_non_negative)
        .fold(1.0_f64, f64::max);
    let drawable = (height - BAR_MARGIN).max(0.0);
    let baseline = height - BAR_LABEL_BAND;

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = if n == 1 {
                (width - bar_width) / 2.0
            } else {
                i as f32 * (width - bar_width) / (n - 1) as f32
            };
            let bar_height = (finite_non_negative(*value) / max_value) as f32 * drawable;

            BarGeometry {
                x,
                y: baseline - bar_height,
                width: bar_width,
                height: bar_height,
            }
        })
        .collect()
}

/// Ângulos (início, fim) de cada fatia, a partir de 0, na ordem de entrada.
pub fn pie_sectors(values: &[f64]) -> Vec<(f64, f64)> {
    let total = values
        .iter()
        .copied()
        .map(finite_non_negative)
        .sum::<f64>()
        .max(1.0);

    let mut angle = 0.0;
    values
        .iter()
        .map(|value| {
            let start = angle;
            angle += finite_non_negative(*value) / total * TAU;
            (start, angle)
        })
        .collect()
}

/// Corta rótulos longos com reticências.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut truncated: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Linhas da legenda: até `LEGEND_MAX_ENTRIES` entradas e, se sobrar,
/// uma linha "+N más...".
pub fn legend_lines(data: &ChartData, lang: Lang) -> Vec<(Option<usize>, String)> {
    let shown = data.values.len().min(LEGEND_MAX_ENTRIES);
    let mut lines: Vec<(Option<usize>, String)> = (0..shown)
        .map(|i| {
            let text = format!(
                "{} ({})",
                truncate_label(data.label(i), LEGEND_LABEL_CHARS),
                format_value(data.values[i])
            );
            (Some(i), text)
        })
        .collect();

    let hidden = data.values.len() - shown;
    if hidden > 0 {
        lines.push((None, lang.more_entries(hidden)));
    }
    lines
}

// =========================================================================
//  DESENHO
// =========================================================================

fn draw_placeholder(surface: &mut Surface, theme: &ChartTheme, lang: Lang) {
    let size = 2.0;
    let y = surface.height() / 2.0 - GLYPH_HEIGHT as f32 * size / 2.0;
    let x = surface.width() / 2.0;
    surface.draw_text(lang.no_data(), x, y, size, TextAlign::Center, theme.text);
}

pub fn draw_bar_chart(surface: &mut Surface, data: &ChartData, theme: &ChartTheme, lang: Lang) {
    surface.clear(theme.background);
    if data.is_empty() {
        draw_placeholder(surface, theme, lang);
        return;
    }

    let height = surface.height();
    let bars = bar_layout(&data.values, surface.width(), height);
    let text_size = 1.0;

    for (i, bar) in bars.iter().enumerate() {
        surface.fill_rect(bar.x, bar.y, bar.width, bar.height, theme.bar);

        let center = bar.x + bar.width / 2.0;
        let label = truncate_label(data.label(i), LEGEND_LABEL_CHARS);
        surface.draw_text(
            &label,
            center,
            height - BAR_LABEL_BAND + 6.0,
            text_size,
            TextAlign::Center,
            theme.text,
        );
        surface.draw_text(
            &format_value(data.values[i]),
            center,
            bar.y - GLYPH_HEIGHT as f32 - 4.0,
            text_size,
            TextAlign::Center,
            theme.text,
        );
    }
}

pub fn draw_pie_chart(surface: &mut Surface, data: &ChartData, theme: &ChartTheme, lang: Lang) {
    surface.clear(theme.background);
    if data.is_empty() || data.total() <= 0.0 {
        draw_placeholder(surface, theme, lang);
        return;
    }

    let (width, height) = (surface.width(), surface.height());
    let radius = (height.min(width / 2.0) / 2.0 - PIE_PADDING).max(1.0);
    let (cx, cy) = (PIE_PADDING + radius, height / 2.0);

    for (i, (start, end)) in pie_sectors(&data.values).into_iter().enumerate() {
        surface.fill_sector(cx, cy, radius, start, end, theme.color(i));
    }

    let legend_x = cx + radius + 2.0 * PIE_PADDING;
    let mut y = PIE_PADDING;
    for (index, text) in legend_lines(data, lang) {
        let text_x = match index {
            Some(i) => {
                surface.fill_rect(legend_x, y, LEGEND_SWATCH, LEGEND_SWATCH, theme.color(i));
                legend_x + LEGEND_SWATCH + 6.0
            }
            None => legend_x,
        };
        surface.draw_text(&text, text_x, y + 1.5, 1.0, TextAlign::Left, theme.text);
        y += LEGEND_LINE_HEIGHT;
    }
}

pub fn draw(surface: &mut Surface, kind: ChartKind, data: &ChartData, theme: &ChartTheme, lang: Lang) {
    match kind {
        ChartKind::Bar => draw_bar_chart(surface, data, theme, lang),
        ChartKind::Pie => draw_pie_chart(surface, data, theme, lang),
    }
}

// =========================================================================
//  VIEW (assinatura do "resize observer")
// =========================================================================

/// Um gráfico montado: guarda as últimas dimensões conhecidas e só
/// redesenha quando elas mudam.
#[derive(Debug, Clone)]
pub struct ChartView {
    kind: ChartKind,
    data: ChartData,
    theme: ChartTheme,
    lang: Lang,
    surface: Surface,
    draws: u64,
}

impl ChartView {
    pub fn new(
        kind: ChartKind,
        data: ChartData,
        theme: ChartTheme,
        lang: Lang,
        dims: &ChartDimensions,
    ) -> Self {
        let mut view = Self {
            kind,
            data,
            theme,
            lang,
            surface: Surface::from_dimensions(dims),
            draws: 0,
        };
        view.redraw();
        view
    }

    pub fn redraw(&mut self) {
        draw(&mut self.surface, self.kind, &self.data, &self.theme, self.lang);
        self.draws += 1;
    }

    /// Notificação de resize: recalcula a superfície e redesenha.
    /// Mesmas dimensões = nada acontece.
    pub fn on_resize(&mut self, width: u32, height: u32, dpr: f32) -> bool {
        if !self.surface.resize(width, height, dpr) {
            return false;
        }
        tracing::debug!(width, height, dpr, "superfície redimensionada, redesenhando");
        self.redraw();
        true
    }

    pub fn set_data(&mut self, data: ChartData) {
        self.data = data;
        self.redraw();
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(labels: &[&str], values: &[f64]) -> ChartData {
        ChartData::new(labels.iter().map(|s| s.to_string()).collect(), values.to_vec())
    }

    fn dims(width: u32, height: u32, dpr: f32) -> ChartDimensions {
        ChartDimensions { width, height, dpr }
    }

    #[test]
    fn backing_buffer_follows_device_pixel_ratio() {
        let surface = Surface::new(300, 150, 2.0);
        assert_eq!(surface.backing_size(), (600, 300));
        assert_eq!(surface.width(), 300.0);

        let ink = RGBColor(1, 2, 3);
        let mut surface = Surface::new(300, 150, 1.0);
        surface.fill_rect(10.0, 10.0, 5.0, 5.0, ink);
        assert_eq!(surface.pixel(12, 12), Some(ink));
        assert_eq!(surface.pixel(17, 17), Some(RGBColor(0, 0, 0)));

        let mut retina = Surface::new(300, 150, 2.0);
        retina.fill_rect(10.0, 10.0, 5.0, 5.0, ink);
        // mesmo retângulo CSS cobre o dobro de pixels físicos
        assert_eq!(retina.pixel(21, 21), Some(ink));
        assert_eq!(retina.pixel(28, 28), Some(ink));
        assert_eq!(retina.pixel(32, 32), Some(RGBColor(0, 0, 0)));
        assert_eq!(retina.pixel(600, 0), None);
    }

    #[test]
    fn backing_buffer_is_capped() {
        let surface = Surface::new(2048, 100, 4.0);
        assert_eq!(surface.dpr(), 2.0);
        assert_eq!(surface.backing_size(), (4096, 200));
    }

    #[test]
    fn resize_with_same_dimensions_is_a_no_op() {
        let mut surface = Surface::new(200, 100, 2.0);
        assert!(!surface.resize(200, 100, 2.0));
        assert!(surface.resize(200, 100, 3.0));
        assert_eq!(surface.backing_size(), (600, 300));
    }

    #[test]
    fn single_bar_is_centered() {
        let bars = bar_layout(&[5.0], 400.0, 200.0);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].width, 200.0);
        assert_eq!(bars[0].x, 100.0);
        assert_eq!(bars[0].height, 160.0);
    }

    #[test]
    fn bars_spread_edge_to_edge() {
        let bars = bar_layout(&[1.0, 2.0, 4.0], 600.0, 240.0);
        assert_eq!(bars[0].width, 100.0);
        assert_eq!(bars[0].x, 0.0);
        assert_eq!(bars[1].x, 250.0);
        assert_eq!(bars[2].x, 500.0);
        assert_eq!(bars[2].height, 200.0);
        assert_eq!(bars[0].height, 50.0);
        assert_eq!(bars[2].y, 20.0);
    }

    #[test]
    fn all_zero_bars_have_no_height() {
        let bars = bar_layout(&[0.0, 0.0, 0.0], 300.0, 150.0);
        assert_eq!(bars.len(), 3);
        assert!(bars.iter().all(|b| b.height == 0.0 && b.height.is_finite()));

        // e desenhar não entra em pânico
        let mut surface = Surface::new(300, 150, 1.0);
        draw_bar_chart(
            &mut surface,
            &data(&["a", "b", "c"], &[0.0, 0.0, 0.0]),
            &ChartTheme::default(),
            Lang::Es,
        );
    }

    #[test]
    fn pie_sectors_cover_the_circle_in_order() {
        let sectors = pie_sectors(&[1.0, 1.0, 2.0]);
        assert_eq!(sectors[0].0, 0.0);
        assert!((sectors[1].0 - TAU / 4.0).abs() < 1e-9);
        assert!((sectors[2].1 - TAU).abs() < 1e-9);

        // total com piso 1: nada de NaN
        assert!(pie_sectors(&[0.0, 0.0]).iter().all(|(s, e)| *s == 0.0 && *e == 0.0));
    }

    #[test]
    fn palette_cycles_by_index() {
        let theme = ChartTheme::default();
        assert_eq!(theme.color(0), theme.color(theme.palette.len()));
        assert_ne!(theme.color(0), theme.color(1));
    }

    #[test]
    fn long_labels_are_ellipsized() {
        assert_eq!(truncate_label("Ana", 14), "Ana");
        let cut = truncate_label("Constructora del Pacífico", 14);
        assert_eq!(cut.chars().count(), 14);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn legend_appends_more_line_past_budget() {
        let labels: Vec<String> = (0..11).map(|i| format!("asesor {i}")).collect();
        let values = vec![1.0; 11];
        let lines = legend_lines(&ChartData::new(labels, values), Lang::Es);

        assert_eq!(lines.len(), LEGEND_MAX_ENTRIES + 1);
        assert_eq!(lines[0], (Some(0), "asesor 0 (1)".to_string()));
        assert_eq!(lines.last().unwrap(), &(None, "+3 más...".to_string()));

        let short = legend_lines(&data(&["a", "b"], &[2.0, 0.5]), Lang::En);
        assert_eq!(short.len(), 2);
        assert_eq!(short[1].1, "b (0.5)");
    }

    #[test]
    fn empty_pie_draws_placeholder_only() {
        let theme = ChartTheme::default();
        let mut surface = Surface::new(200, 100, 1.0);
        draw_pie_chart(&mut surface, &data(&["a"], &[0.0]), &theme, Lang::Es);

        let (bw, bh) = surface.backing_size();
        let mut palette_pixels = 0;
        let mut text_pixels = 0;
        for y in 0..bh {
            for x in 0..bw {
                let px = surface.pixel(x, y).unwrap();
                if theme.palette.contains(&px) {
                    palette_pixels += 1;
                }
                if px == theme.text {
                    text_pixels += 1;
                }
            }
        }
        assert_eq!(palette_pixels, 0);
        assert!(text_pixels > 0);
    }

    #[test]
    fn pie_fills_sectors_with_palette_colors() {
        let theme = ChartTheme::default();
        let mut surface = Surface::new(400, 200, 1.0);
        draw_pie_chart(&mut surface, &data(&["a", "b"], &[1.0, 1.0]), &theme, Lang::Es);

        // raio = min(200, 200)/2 - 10 = 90, centro (100, 100)
        // ângulo pequeno positivo fica na primeira fatia (abaixo do eixo x)
        assert_eq!(surface.pixel(150, 110), Some(theme.color(0)));
        assert_eq!(surface.pixel(150, 90), Some(theme.color(1)));
    }

    #[test]
    fn single_slice_fills_whole_disc() {
        let theme = ChartTheme::default();
        let mut surface = Surface::new(400, 200, 1.0);
        draw_pie_chart(&mut surface, &data(&["a"], &[4.0]), &theme, Lang::Es);

        // volta completa: os quatro lados do centro (100, 100) na cor 0
        for (x, y) in [(50, 100), (150, 100), (100, 40), (100, 160)] {
            assert_eq!(surface.pixel(x, y), Some(theme.color(0)));
        }
        assert_eq!(surface.pixel(5, 5), Some(theme.background));
    }

    #[test]
    fn labels_are_inked_in_text_color() {
        let theme = ChartTheme::default();
        let mut surface = Surface::new(120, 40, 1.0);
        surface.clear(theme.background);
        surface.draw_text("88", 4.0, 4.0, 1.0, TextAlign::Left, theme.text);

        let (bw, bh) = surface.backing_size();
        let inked = (0..bh)
            .flat_map(|y| (0..bw).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == Some(theme.text))
            .count();
        assert!(inked > 0);
        assert_eq!(surface.pixel(100, 30), Some(theme.background));
    }

    #[test]
    fn view_redraws_only_when_dimensions_change() {
        let mut view = ChartView::new(
            ChartKind::Bar,
            data(&["a"], &[3.0]),
            ChartTheme::default(),
            Lang::Es,
            &dims(200, 100, 1.0),
        );
        assert_eq!(view.draws(), 1);

        assert!(!view.on_resize(200, 100, 1.0));
        assert_eq!(view.draws(), 1);

        assert!(view.on_resize(200, 100, 2.0));
        assert_eq!(view.draws(), 2);
        assert_eq!(view.surface().backing_size(), (400, 200));
    }

    #[test]
    fn surface_encodes_to_png() {
        let view = ChartView::new(
            ChartKind::Pie,
            data(&["a", "b"], &[3.0, 1.0]),
            ChartTheme::default(),
            Lang::Es,
            &dims(120, 60, 1.0),
        );
        let png = view.surface().encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
