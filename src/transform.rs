use crate::models::{
    ChartSeries, DailySeries, DailyVariable, NamedSeries, RawSeriesResponse, TableRow,
};

/// Series drawn on the chart, in display order
const CHART_SERIES: [(DailyVariable, &str); 3] = [
    (DailyVariable::TemperatureMax, "Max Temperature"),
    (DailyVariable::TemperatureMin, "Min Temperature"),
    (DailyVariable::TemperatureMean, "Mean Temperature"),
];

fn daily(raw: Option<&RawSeriesResponse>) -> Option<&DailySeries> {
    raw.and_then(|r| r.daily.as_ref())
}

/// Build the chart series set.
///
/// Returns `None` when there is no payload or it carries no `daily` block.
/// All three series are always present; a variable missing from the payload
/// yields an empty series rather than being dropped.
pub fn to_chart_series(raw: Option<&RawSeriesResponse>) -> Option<ChartSeries> {
    let daily = daily(raw)?;

    let series = CHART_SERIES
        .iter()
        .map(|(variable, name)| NamedSeries {
            name: (*name).to_string(),
            values: daily.column(*variable).as_slice().to_vec(),
        })
        .collect();

    Some(ChartSeries {
        labels: daily.time.clone(),
        series,
    })
}

/// Build one table row per date on the label axis.
///
/// Each field is read independently, so a row can mix numbers and `"N/A"`.
/// Values are copied as-is; display rounding belongs to the renderer.
pub fn to_table_rows(raw: Option<&RawSeriesResponse>) -> Vec<TableRow> {
    let Some(daily) = daily(raw) else {
        return Vec::new();
    };

    let temp_max = daily.column(DailyVariable::TemperatureMax);
    let temp_min = daily.column(DailyVariable::TemperatureMin);
    let temp_mean = daily.column(DailyVariable::TemperatureMean);
    let apparent_max = daily.column(DailyVariable::ApparentTemperatureMax);
    let apparent_min = daily.column(DailyVariable::ApparentTemperatureMin);
    let apparent_mean = daily.column(DailyVariable::ApparentTemperatureMean);

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| TableRow {
            id: i + 1,
            date: date.clone(),
            temp_max: temp_max.get(i),
            temp_min: temp_min.get(i),
            temp_mean: temp_mean.get(i),
            apparent_temp_max: apparent_max.get(i),
            apparent_temp_min: apparent_min.get(i),
            apparent_temp_mean: apparent_mean.get(i),
        })
        .collect()
}
