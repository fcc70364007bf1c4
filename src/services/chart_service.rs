// src/services/chart_service.rs

use crate::{
    common::{error::AppError, i18n::Lang},
    models::chart::{ChartData, ChartDimensions, ChartKind},
    services::chart_renderer::{ChartTheme, ChartView},
};

#[derive(Clone, Default)]
pub struct ChartService {
    theme: ChartTheme,
}

impl ChartService {
    pub fn new(theme: ChartTheme) -> Self {
        Self { theme }
    }

    /// Desenha o gráfico e devolve o PNG em memória.
    pub fn render_png(
        &self,
        kind: ChartKind,
        data: ChartData,
        dims: &ChartDimensions,
        lang: Lang,
    ) -> Result<Vec<u8>, AppError> {
        let categories = data.values.len();
        let view = ChartView::new(kind, data, self.theme.clone(), lang, dims);
        let png = view.surface().encode_png()?;

        tracing::debug!(
            ?kind,
            categories,
            width = dims.width,
            height = dims.height,
            dpr = dims.dpr,
            bytes = png.len(),
            "gráfico renderizado"
        );
        Ok(png)
    }
}
