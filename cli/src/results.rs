use actuators::signal::{SignalSpec, SignalValue};
use csv::Writer;
use std::io::Write;

use crate::CliErrors;

/// Writes one CSV row per tick: the tick time followed by every output
/// signal component.
pub struct ResultWriter<W: Write> {
    writer: Writer<W>,
    columns: usize,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(inner: W, outputs: &[(SignalSpec, SignalValue)]) -> Result<Self, CliErrors> {
        let mut headers = vec!["time".to_string()];
        for (spec, _) in outputs {
            headers.extend(spec.headers());
        }

        let mut writer = Writer::from_writer(inner);
        writer.write_record(&headers)?;
        Ok(Self { writer, columns: headers.len() })
    }

    pub fn write_record(
        &mut self,
        time: f64,
        outputs: &[(SignalSpec, SignalValue)],
    ) -> Result<(), CliErrors> {
        let mut record = Vec::with_capacity(self.columns);
        record.push(time.to_string());
        for (_, value) in outputs {
            record.extend(
                value
                    .components()
                    .iter()
                    .map(|c| c.to_string()),
            );
        }
        self.writer
            .write_record(&record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CliErrors> {
        self.writer
            .flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, CliErrors> {
        self.writer
            .into_inner()
            .map_err(|e| CliErrors::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actuators::{Actuator, Magnetorquer};
    use safemath::CartesianVector3;

    #[test]
    fn test_headers_and_rows() {
        let mut mtq = Actuator::new("mtq", Magnetorquer::new(CartesianVector3::Z));
        mtq.activate()
            .unwrap();
        mtq.start()
            .unwrap();

        let mut results = ResultWriter::new(Vec::new(), &mtq.output_values()).unwrap();
        mtq.inputs_mut()
            .b = CartesianVector3::X;
        mtq.inputs_mut()
            .i = 1.0;
        mtq.execute()
            .unwrap();
        results
            .write_record(0.5, &mtq.output_values())
            .unwrap();

        let csv = String::from_utf8(
            results
                .into_inner()
                .unwrap(),
        )
        .unwrap();
        let lines: Vec<_> = csv
            .lines()
            .collect();
        assert_eq!(lines[0], "time,torque[x],torque[y],torque[z]");
        assert_eq!(lines[1], "0.5,0,1,0");
    }
}
