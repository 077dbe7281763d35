use stellium::{
    BuiltinGazetteer, ChartAssembler, ChartInputs, ChartOptions, GeotemporalResolver,
    SwissEphemerisProvider,
};

fn main() {
    env_logger::init();

    let resolver =
        GeotemporalResolver::new(Box::new(BuiltinGazetteer), Box::new(BuiltinGazetteer));
    let assembler = ChartAssembler::new(resolver, Box::new(SwissEphemerisProvider));

    let inputs = ChartInputs {
        year: 2000,
        month: 1,
        day: 1,
        time: "12:00".to_string(),
        location: "Greenwich, UK".to_string(),
    };

    match assembler.compute_chart(&inputs, &ChartOptions::natal()) {
        Ok(document) => match serde_json::to_string_pretty(&document) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {:?}", e),
        },
        Err(e) => eprintln!("Error: {:?}", e),
    }
}
